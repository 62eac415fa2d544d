use clap::Parser;
use xdg_portal_open::{DialogResult, FileChooser, FileFilter, config::Config};

/// Ask the desktop portal for a file and print its path.
#[derive(Parser, Debug)]
struct Args {
    /// Dialog title, overriding the configured one
    #[arg(long)]
    title: Option<String>,
    /// Filter as NAME=EXT[,EXT...], e.g. Images=png,jpg
    #[arg(long = "filter", value_name = "NAME=EXTS")]
    filters: Vec<FileFilter>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = Config::load();
    if let Some(title) = args.title {
        config.open_file.title = title;
    }

    let mut chooser = FileChooser::connect(config).await?;
    match chooser.open_file(&args.filters).await? {
        DialogResult::Open(path) => println!("{}", path.display()),
        DialogResult::Cancel => eprintln!("cancelled"),
    }

    Ok(())
}
