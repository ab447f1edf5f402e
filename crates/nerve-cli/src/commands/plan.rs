use crate::cli::PlanArgs;
use crate::config::builder::build_config;
use crate::config::models::CliOverrides;
use crate::error::Result;
use nervemodel::core::template::TemplateStore;
use nervemodel::engine::error::EngineError;
use nervemodel::engine::plan::BuildPlan;
use nervemodel::workflows::build::template_store;
use std::io::Write;
use tracing::info;

pub fn run(args: PlanArgs) -> Result<()> {
    let app = build_config(
        &args.project_root,
        args.config.as_deref(),
        &args.set_values,
        &CliOverrides::default(),
    )?;
    let store = template_store(&app.settings);
    let master = store.load_master().map_err(EngineError::from)?;
    info!("Planning {} cuff preset(s).", master.cuff.preset.len());

    let mut plans = Vec::with_capacity(master.cuff.preset.len());
    for name in &master.cuff.preset {
        let data = store.load_template(name).map_err(EngineError::from)?;
        plans.push(BuildPlan::from_template(name, data));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for plan in &plans {
        write_plan(&mut out, plan)?;
    }
    writeln!(
        out,
        "Fascicles: {}",
        master.fascicles_dir(&app.settings.project_root).display()
    )?;
    Ok(())
}

pub fn write_plan(out: &mut impl Write, plan: &BuildPlan) -> std::io::Result<()> {
    writeln!(out, "{} (parameter group '{}')", plan.template, plan.group_label)?;
    for param in &plan.params {
        writeln!(out, "  param     {} = {}", param.name, param.expression)?;
    }
    for type_name in &plan.primitive_types {
        writeln!(out, "  primitive {}", type_name)?;
    }
    for type_name in &plan.material_types {
        writeln!(out, "  material  {}", type_name)?;
    }
    for instance in &plan.instances {
        writeln!(out, "  instance  {} : {}", instance.label, instance.type_name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nervemodel::core::template::TemplateData;

    #[test]
    fn plan_lists_each_section_in_creation_order() {
        let data: TemplateData = serde_json::from_str(
            r#"{
                "params": [{"name": "r", "expression": "1[mm]", "description": "radius"}],
                "instances": [
                    {"type": "TubeCuff_Primitive", "label": "cuff0", "materials": [{"type": "silicone"}]},
                    {"type": "TubeCuff_Primitive", "label": "cuff1"}
                ]
            }"#,
        )
        .unwrap();
        let plan = BuildPlan::from_template("Two.json", data);

        let mut out = Vec::new();
        write_plan(&mut out, &plan).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Two.json (parameter group 'Two')");
        assert_eq!(lines[1], "  param     r = 1[mm]");
        assert_eq!(lines[2], "  primitive TubeCuff_Primitive");
        assert_eq!(lines[3], "  material  silicone");
        assert_eq!(lines.len(), 6);
    }
}
