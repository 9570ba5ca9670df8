//! drivelake — upload local files into a dated, categorized Drive hierarchy.
//!
//! Files land under `root/year/month/project/type/<category>`, deduplicated
//! by SHA-256 content digest. Provision `credentials.json` and `token.json`
//! before the first run; consent is handled out of band.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use drivelake_cli::{init_tracing, uploader};
use drivelake_core::Config;
use drivelake_drive::{Authenticator, DriveClient, DriveScope};

#[derive(Parser)]
#[command(
    name = "drivelake",
    about = "Upload local files into a dated, categorized Google Drive hierarchy"
)]
struct Cli {
    /// Local file or directory to upload
    input: PathBuf,

    /// OAuth client secrets file
    #[arg(long, default_value = "credentials.json")]
    credentials: PathBuf,

    /// Cached authorization token file
    #[arg(long, default_value = "token.json")]
    token: PathBuf,

    /// Upload into a shared drive instead of My Drive
    #[arg(long)]
    use_shared_drive: bool,

    /// Shared drive identifier (required with --use-shared-drive)
    #[arg(long)]
    drive_id: Option<String>,

    /// Name of the top-level folder
    #[arg(long, default_value = "DataLake")]
    root_folder: String,

    /// Project tag, third level of the folder chain
    #[arg(long, default_value = "creative")]
    project: String,

    /// Type tag, fourth level of the folder chain
    #[arg(long = "type", default_value = "media")]
    type_tag: String,

    /// Year override (defaults to the current UTC year)
    #[arg(long)]
    year: Option<i32>,

    /// Month override (defaults to the current UTC month)
    #[arg(long)]
    month: Option<u32>,

    /// Comma-separated extension allow-list, e.g. "mp4,mov"
    #[arg(long, default_value = "")]
    ext: String,

    /// Always create new files instead of updating same-named ones
    #[arg(long)]
    overwrite: bool,

    /// Skip checksum computation (disables dedupe as well)
    #[arg(long)]
    no_checksum: bool,

    /// Upload files even when their checksum already exists remotely
    #[arg(long)]
    no_dedupe: bool,

    /// Upload chunk size in MiB
    #[arg(long, default_value_t = 16)]
    chunk_size_mb: usize,

    /// Reserved for future use
    #[arg(long, hide = true)]
    validate_basic: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            credentials_path: self.credentials,
            token_path: self.token,
            use_shared_drive: self.use_shared_drive,
            drive_id: self.drive_id,
            root_folder: self.root_folder,
            project: self.project,
            type_tag: self.type_tag,
            input_path: self.input,
            year: self.year,
            month: self.month,
            allowed_ext: self.ext,
            overwrite: self.overwrite,
            checksum: !self.no_checksum,
            dedupe_by_checksum: !self.no_dedupe,
            chunk_size_mb: self.chunk_size_mb,
            validate_basic: self.validate_basic,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = Cli::parse().into_config();
    config.validate().context("Invalid configuration")?;

    let auth = Authenticator::from_files(&config.credentials_path, &config.token_path)
        .context("Failed to load Drive credentials")?;
    let scope = match config.shared_drive_id() {
        Some(id) => DriveScope::SharedDrive(id.to_string()),
        None => DriveScope::User,
    };
    let client = DriveClient::new(auth, scope, config.chunk_size_bytes())
        .context("Failed to create Drive client")?;

    let report = uploader::run_upload(&client, &config).await?;

    print!("{}", report.summary());
    std::process::exit(report.exit_code());
}
