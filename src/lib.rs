//! `gofile` is a crate to upload files and folders to <https://gofile.io/> and manage the
//! uploaded content.
//!
//! These features are supported:
//! * Server selection and account lookup.
//! * Single file uploads, with or without a token.
//! * Folder uploads, one file after another with a pause in between.
//! * Folder creation, option setting, content retrieval, copy and deletion.
//!
//! Every Gofile endpoint answers with `{"status": ..., "data": ...}`. Methods return the
//! `data` part as a [`serde_json::Value`] and turn any other status into
//! [`Error::ResponseError`]. Failures past the input checks are wrapped in
//! [`Error::JobFailed`].
//!
//! ## Example
//!
//! To upload a single file as a guest:
//! ```no_run
//! # async fn run() -> gofile::Result<()> {
//! let client = gofile::GoFile::anonymous();
//! let uploaded = client.upload_file("photo.jpg", None).await?;
//! println!("{}", uploaded["downloadPage"]);
//! # Ok(())
//! # }
//! ```
//!
//! To upload a directory into a new folder of your account:
//! ```no_run
//! # async fn run() -> gofile::Result<()> {
//! let client = gofile::GoFile::new(Some("your-token".to_owned())).await?;
//! let uploaded = client
//!     .upload_folder(
//!         "holiday",  // the folder path
//!         None,  // no folder id, so a new folder is created
//!         Some("Holiday"),  // label of the created folder
//!         None,  // default delay of 2 seconds between files
//!     )
//!     .await?;
//! println!("{} files uploaded", uploaded.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod helper;
pub mod session;

pub use api::ContentOption;
pub use client::{validate_token, GoFile};
pub use config::Config;
pub use error::{Error, Result};
