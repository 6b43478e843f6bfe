use anyhow::Result;
use gofile::{session::ProgressListener, GoFile};
use std::env;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = env::args().collect::<Vec<_>>();

    match args.as_slice() {
        [_, path] => upload(path, None).await,
        [_, path, folder_id] => upload(path, Some(folder_id)).await,
        _ => panic!("\n\nPlease input [path_to_the_file] and optionally [folder_id]\n\n"),
    }
}

async fn upload(path: &String, folder_id: Option<&String>) -> Result<()> {
    let listener: ProgressListener = Arc::new(Mutex::new(|name: Arc<String>, pos: usize, total: usize| {
        println!("name: {name} {pos}/{total}");
    }));

    // picks up GOFILE_TOKEN when set, uploads as a guest otherwise
    let client = GoFile::from_env().await?.with_progress_listener(listener);
    let result = client
        .upload_file(path, folder_id.map(String::as_str))
        .await?;

    println!("result: {:#}", result);

    Ok(())
}
