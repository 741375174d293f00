pub mod network_map;
pub mod settings_view;
