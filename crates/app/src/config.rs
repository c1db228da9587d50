use std::io::BufRead;

use editor_core::encoding::TextEncoding;

#[derive(Debug, clap::Parser)]
#[command(
    name = "workbench",
    version,
    about = "Encoding-aware text workbench: symbols, bookmarks and two-buffer diff packages"
)]
pub struct Cli {
    #[command(flatten)]
    pub config: WorkbenchConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct WorkbenchConfig {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "WORKBENCH_LOG", default_value = "info")]
    pub log_level: String,

    /// Encoding to save with instead of the detected one (utf8 or sjis).
    #[arg(long, global = true, value_parser = parse_encoding)]
    pub encoding: Option<TextEncoding>,

    /// Language identifier to use instead of the one derived from the file name.
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Answer to "open this .diff file as a comparison?".
    #[arg(
        long,
        global = true,
        env = "WORKBENCH_COMPARISON",
        value_enum,
        default_value_t = ComparisonPolicy::Ask
    )]
    pub comparison: ComparisonPolicy,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            encoding: None,
            language: None,
            comparison: ComparisonPolicy::Ask,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print the detected encoding, language and mode of a file.
    Detect { file: std::path::PathBuf },
    /// List callable symbols with their line ranges.
    Symbols { file: std::path::PathBuf },
    /// Find the declaration of the symbol called on a line.
    Definition {
        file: std::path::PathBuf,
        #[arg(long)]
        line: usize,
    },
    /// Find declaration and call sites of the symbol declared or called on a line.
    References {
        file: std::path::PathBuf,
        #[arg(long)]
        line: usize,
    },
    /// Bundle two files into one diff package.
    Pack {
        original: std::path::PathBuf,
        modified: std::path::PathBuf,
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Split a diff package back into its two sides.
    Unpack {
        file: std::path::PathBuf,
        #[arg(long)]
        original_out: Option<std::path::PathBuf>,
        #[arg(long)]
        modified_out: Option<std::path::PathBuf>,
    },
    /// Re-save a file in another encoding.
    Convert {
        file: std::path::PathBuf,
        #[arg(long, value_parser = parse_encoding)]
        to: TextEncoding,
        /// Defaults to overwriting the input.
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
}

fn parse_encoding(label: &str) -> Result<TextEncoding, String> {
    TextEncoding::from_label(label).ok_or_else(|| format!("unknown encoding `{label}`"))
}

/// How the diff-load question gets answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ComparisonPolicy {
    /// Ask on the terminal.
    Ask,
    Yes,
    No,
}

impl editor_state::Prompt for ComparisonPolicy {
    fn confirm_comparison(&mut self, file_name: &str) -> bool {
        match self {
            ComparisonPolicy::Yes => true,
            ComparisonPolicy::No => false,
            ComparisonPolicy::Ask => {
                eprint!("{file_name} looks like a diff package. Open as comparison? [y/N] ");
                let mut answer = String::new();
                match std::io::stdin().lock().read_line(&mut answer) {
                    Ok(_) => is_yes(&answer),
                    Err(err) => {
                        tracing::warn!(%err, "could not read answer; opening as text");
                        false
                    }
                }
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
