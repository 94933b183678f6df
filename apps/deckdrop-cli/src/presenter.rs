//! Terminal rendering of surface side effects

use deckdrop_ingestion::Presenter;

use crate::output;

/// Prints notices and the error view to the terminal
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn show_invalid_file_notice(&self, message: &str) {
        output::warning(message);
    }

    fn go_to_error_view(&self) {
        output::error("Something went wrong while attaching the presentation.");
    }
}
