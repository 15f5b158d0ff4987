use clap::Parser;

/// Stage lines of text and commit them as a batch of items.
#[derive(Parser, Debug, Default)]
#[command(version)]
pub struct Cli {
    /// Cap the staging editor at this many visible rows; taller content
    /// scrolls inside the editor instead of growing it.
    #[arg(long, value_name = "ROWS")]
    pub max_rows: Option<u16>,

    /// Seed the editor with a line of text. Repeat to seed several lines.
    #[arg(long = "preset", value_name = "LINE")]
    pub preset_values: Vec<String>,
}
