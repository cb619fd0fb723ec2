pub mod log_folder;

pub use log_folder::{
    load_access_folder, load_auth_folder, load_folder, load_message_folder, parse_file,
};
