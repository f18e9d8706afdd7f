use anyhow::Result;

use famenu_core::bridge::{HostBridge, show_intent};
use famenu_core::service::MenuService;

/// Show the primary button for the current tab, or press it.
pub(crate) fn cmd_button(
    service: &mut MenuService,
    host: &mut dyn HostBridge,
    press: bool,
    json: bool,
) -> Result<()> {
    if !press {
        let intent = service.main_button_intent();
        if json {
            println!("{}", serde_json::to_string_pretty(&intent)?);
        } else {
            show_intent(host, &intent);
        }
        return Ok(());
    }

    let action = service.activate_main_button(host);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "action": action,
                "next": service.main_button_intent(),
                "progress": service.progress(),
            })
        );
    }
    Ok(())
}
