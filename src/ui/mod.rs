pub mod auth_dialog;
pub mod header;
pub mod results_panel;
pub mod run_bar;
pub mod sidebar;
pub mod style;
pub mod test_tree;
pub mod toasts;
