use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only show components of this kind (command, hook, agent)
    #[arg(long, short = 'k', value_name = "KIND")]
    pub kind: Option<String>,

    /// Only show components in this category
    #[arg(long, short = 'c', value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Include disabled components
    #[arg(long, short = 'a')]
    pub all: bool,
}
