mod settings;

pub use settings::{
    Config, LaunchConfig, LayoutSettings, PickerSettings, Settings, BASE_DIR_ENV,
};
