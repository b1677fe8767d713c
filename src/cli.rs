use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bible-verse-store")]
#[command(about = "Store and look up verse text in raw index/data files", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Module .conf file describing the store")]
    pub conf: Option<PathBuf>,

    #[arg(long, global = true, default_value = ".", help = "Library root that DataPath in --conf is relative to")]
    pub module_root: PathBuf,

    #[arg(long, global = true, help = "Store directory (used when --conf is not given)")]
    pub data_path: Option<PathBuf>,

    #[arg(long, global = true, default_value = "KJV", help = "Versification (used when --conf is not given)")]
    pub versification: String,

    #[arg(long, global = true, help = "Log directory")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out an empty store, discarding any existing contents
    Create,

    /// Store verse text from lines of the form `<reference>\t<text>`
    Import {
        #[arg(help = "Tab-separated input file")]
        input: PathBuf,
    },

    /// Make one verse share the stored text of another
    Alias {
        #[arg(help = "Verse that receives the text")]
        alias: String,

        #[arg(help = "Verse whose text is shared")]
        canonical: String,
    },

    /// Print the text of every verse in a passage
    Lookup {
        #[arg(help = "Passage, e.g. \"Gen 1:1-5, 8; John 3:16\"")]
        passage: String,

        #[arg(long, help = "Skip verses with no stored text instead of failing")]
        skip_missing: bool,
    },

    /// Print store statistics as JSON
    Info,

    /// List the module descriptions found under a directory
    Modules {
        #[arg(help = "Directory searched recursively for *.conf")]
        dir: PathBuf,
    },
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
