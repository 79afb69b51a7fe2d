use std::path::Path;

use echobench_core::types::{system_presets_from_env, MaskedVendorConfig};
use serde::Serialize;

use crate::cmd::registry_with_overlay;
use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct VendorList {
    vendors: Vec<MaskedVendorConfig>,
}

/// Lists environment-provisioned vendor configurations. Key material is
/// masked; only its presence is reported.
pub async fn vendors_cmd(overlay: Option<&Path>, output: OutputArgs) -> i32 {
    let registry = match registry_with_overlay(overlay, output.format, output.quiet) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let vendors: Vec<MaskedVendorConfig> = system_presets_from_env(&registry.get_all())
        .iter()
        .map(|v| v.masked())
        .collect();

    if output.format == OutputFormat::Text && !output.quiet {
        if vendors.is_empty() {
            println!("no vendors provisioned (set ECHOBENCH_<TEMPLATE>_API_KEY)");
        }
        for v in &vendors {
            let url = if v.url.is_empty() { "template default" } else { v.url.as_str() };
            println!(
                "{:<20} template={:<12} key={:<10} url={}",
                v.id,
                v.template_id,
                if v.api_key.is_empty() { "absent" } else { "present" },
                url
            );
        }
    } else {
        print_result(output.format, output.quiet, &VendorList { vendors });
    }
    exit_codes::SUCCESS
}
