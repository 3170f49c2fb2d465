mod descriptor;
mod desktop_entry;
mod table;

pub use descriptor::{app_table, show_app, AppDescriptor, AppList};
pub use desktop_entry::DesktopEntry;
pub use table::render_table;
