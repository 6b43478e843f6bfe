use anyhow::Result;
use gofile::GoFile;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = env::args().collect::<Vec<_>>();

    match args.as_slice() {
        [_, path, auth_token] => upload(path, auth_token).await,
        _ => panic!("\n\nPlease input [path_to_the_folder] and [gofile_token]\n\n"),
    }
}

async fn upload(path: &String, auth_token: &String) -> Result<()> {
    let client = GoFile::new(Some(auth_token.to_owned())).await?;
    let results = client
        .upload_folder(path, None, Some("gofile-rs"), Some(Duration::from_secs(1)))
        .await?;

    for result in &results {
        println!("uploaded: {}", result["downloadPage"]);
    }

    Ok(())
}
