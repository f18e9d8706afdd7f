mod audit;
mod button;
mod helpers;
mod menu;
mod settings;
mod shop;
mod week;

pub(crate) use audit::cmd_audit;
pub(crate) use button::cmd_button;
pub(crate) use menu::cmd_menu;
pub(crate) use settings::{SettingsArgs, cmd_settings_set, cmd_settings_show, cmd_tab};
pub(crate) use shop::{
    cmd_shop_check_all, cmd_shop_export, cmd_shop_list, cmd_shop_reset, cmd_shop_select,
    cmd_shop_toggle, cmd_shop_undo,
};
pub(crate) use week::cmd_week;
