// SPDX-License-Identifier: GPL-3.0-only

//! Client for the `org.freedesktop.portal.FileChooser` open-file request.
//!
//! ```no_run
//! # async fn run() -> xdg_portal_open::Result<()> {
//! use xdg_portal_open::{DialogResult, FileChooser, FileFilter, config::Config};
//!
//! let mut chooser = FileChooser::connect(Config::load()).await?;
//! match chooser.open_file(&[FileFilter::new("Images", "png,jpg")]).await? {
//!     DialogResult::Open(path) => println!("{}", path.display()),
//!     DialogResult::Cancel => println!("cancelled"),
//! }
//! # Ok(())
//! # }
//! ```

pub use xdg_portal_open_config as config;

pub mod error;
mod file_chooser;
pub mod handle;
pub mod request;
pub mod response;
pub mod subscription;
pub mod token;
pub mod transport;
pub mod uri;

pub use error::{Error, Result};
pub use file_chooser::{DialogResult, FileChooser};
pub use request::FileFilter;
pub use transport::{BusTransport, Transport};

static DBUS_NAME: &str = "org.freedesktop.portal.Desktop";
static DBUS_PATH: &str = "/org/freedesktop/portal/desktop";
static FILE_CHOOSER_INTERFACE: &str = "org.freedesktop.portal.FileChooser";
static OPEN_FILE_METHOD: &str = "OpenFile";
static REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";
static RESPONSE_SIGNAL: &str = "Response";

const PORTAL_RESPONSE_SUCCESS: u32 = 0;
const PORTAL_RESPONSE_CANCELLED: u32 = 1;
