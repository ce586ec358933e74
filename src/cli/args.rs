use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Workflow folder to migrate; every folder in the catalog when omitted
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Stop after this schema version instead of the latest registered one
    #[arg(long, value_name = "VERSION")]
    pub target: Option<String>,

    /// Print the registered schema versions and exit
    #[arg(long)]
    pub list_versions: bool,

    /// Catalog root containing flowdoc.toml and the workflows directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also report workflow names shared by several folders
    #[arg(long)]
    pub check_consistency: bool,

    /// Accepted for compatibility; README sections are always checked
    #[arg(long)]
    pub check_readme: bool,

    /// Catalog root containing flowdoc.toml and the workflows directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Workflow folder that receives metadata.json
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// File holding the generated metadata text (default: read stdin)
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Overwrite an existing metadata.json
    #[arg(long)]
    pub force: bool,
}
