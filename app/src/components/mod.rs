//! Page panels.
//!
//! Each panel takes the shared `Signal<PageSession>`; panels that only read
//! it re-render when a render pass or filter edit changes what they show.

pub mod company_map;
pub mod company_table;
pub mod file_chooser;
pub mod filter_panel;
pub mod popup_columns_menu;
pub mod toast;

pub use company_map::CompanyMap;
pub use company_table::CompanyTable;
pub use file_chooser::FileChooser;
pub use filter_panel::FilterPanel;
pub use popup_columns_menu::PopupColumnsMenu;
pub use toast::{ToastFrame, ToastSeverity, use_toast, use_toast_provider};
