use anyhow::Result;
use gofile::GoFile;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = env::args().collect::<Vec<_>>();

    match args.as_slice() {
        [_, auth_token] => manage(auth_token).await,
        _ => panic!("\n\nPlease input [gofile_token]\n\n"),
    }
}

async fn manage(auth_token: &String) -> Result<()> {
    let client = GoFile::new(Some(auth_token.to_owned())).await?;

    let account = client.get_account_details().await?;
    let root_folder = account["rootFolder"].as_str().unwrap_or_default();

    let folder = client.create_folder(root_folder, "gofile-rs demo").await?;
    let folder_id = folder["id"].as_str().unwrap_or_default();
    println!("created: {:#}", folder);

    client.set_option(folder_id, "description", "made by the content demo").await?;
    client.set_option(folder_id, "public", true).await?;
    println!("content: {:#}", client.get_content(folder_id).await?);

    client.delete_content(folder_id).await?;
    println!("deleted {folder_id}");

    Ok(())
}
