use clap::Parser;

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Component id to show
    pub id: String,
}
