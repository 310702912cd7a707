//! Step-list descriptor programs.
//!
//! A `.versacore` descriptor declares each hook as an array of single-key
//! step tables. This module holds the typed steps and [`ScriptProgram`], the
//! [`DescriptorProgram`] that interprets them in order.
//!
//! ```toml
//! TOP = [
//!     { define_target = { name = "sim", params = { tool = "verilator" } } },
//!     { set_default_target = "sim" },
//! ]
//! CREATE = [
//!     { depend_on = { name = "fifo", params = { depth = 16 } } },
//! ]
//! GENERATE = [
//!     { run = "python gen.py --depth {{depth}}" },
//!     { add_files = { globs = ["rtl/*.sv"], use_in = "implementation" } },
//!     { set_top = "rtl/top.sv" },
//! ]
//! ```
//!
//! Every string argument is rendered with the hook's
//! [`RenderContext`](versacores_core::domain::RenderContext) before use.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, de};
use tracing::debug;

use versacores_core::{
    application::{
        ports::DescriptorProgram,
        views::{
            CommandView, CreateView, DependencyRequest, ForeignDependency, GenerateView, Stage,
            TopView,
        },
    },
    domain::{FileCategory, Hook, ParamValue, Params, RenderContext, UsageContext},
    error::VersaResult,
};

// ── Steps ─────────────────────────────────────────────────────────────────────

/// Steps allowed in `TOP`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum TopStep {
    DefineTarget {
        name: String,
        #[serde(default)]
        params: Params,
    },
    SetDefaultTarget(String),
}

/// Arguments of a `depend_on` step. `name` is optional here so that its
/// absence is reported by the create view, not by the parser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependOnArgs {
    pub name: Option<String>,
    pub version: Option<String>,
    pub repo: Option<String>,
    #[serde(default)]
    pub params: Params,
}

/// Steps allowed in `CREATE`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum CreateStep {
    DependOn(DependOnArgs),
    DependOnForeign {
        name: String,
        kind: String,
        #[serde(default)]
        params: Params,
    },
    IsSingleton(bool),
}

/// Steps allowed in `GENERATE`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum GenerateStep {
    Run(String),
    AddFiles {
        globs: Vec<String>,
        #[serde(default, rename = "type", deserialize_with = "parse_optional")]
        category: Option<FileCategory>,
        #[serde(default, deserialize_with = "parse_optional")]
        use_in: Option<UsageContext>,
    },
    SetTop(String),
}

/// Steps allowed in `CLEAN`, `GET_SOURCES`, and `PREPARE_SOURCES`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum CommandStep {
    Run(String),
}

/// Deserialize an optional string through `FromStr`, so aliases like
/// `"vhdl"` are accepted and unknown names fail at load time.
fn parse_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| s.parse().map_err(de::Error::custom))
        .transpose()
}

// ── Program ───────────────────────────────────────────────────────────────────

/// The hook table of one `.versacore` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptProgram {
    pub top: Option<Vec<TopStep>>,
    pub create: Vec<CreateStep>,
    pub generate: Vec<GenerateStep>,
    pub clean: Option<Vec<CommandStep>>,
    pub get_sources: Option<Vec<CommandStep>>,
    pub prepare_sources: Option<Vec<CommandStep>>,
}

impl ScriptProgram {
    fn stage_steps(&self, stage: Stage) -> &[CommandStep] {
        let steps = match stage {
            Stage::Clean => &self.clean,
            Stage::GetSources => &self.get_sources,
            Stage::PrepareSources => &self.prepare_sources,
        };
        steps.as_deref().unwrap_or_default()
    }
}

/// Render string parameter values; other values pass through.
fn render_params(ctx: &RenderContext, params: &Params) -> Params {
    fn render_value(ctx: &RenderContext, value: &ParamValue) -> ParamValue {
        match value {
            ParamValue::String(s) => ParamValue::String(ctx.render(s)),
            ParamValue::List(items) => {
                ParamValue::List(items.iter().map(|v| render_value(ctx, v)).collect())
            }
            other => other.clone(),
        }
    }

    params
        .iter()
        .map(|(k, v)| (k.clone(), render_value(ctx, v)))
        .collect()
}

#[async_trait(?Send)]
impl DescriptorProgram for ScriptProgram {
    fn has_hook(&self, hook: Hook) -> bool {
        match hook {
            Hook::Top => self.top.is_some(),
            Hook::Create | Hook::Generate => true,
            Hook::Clean => self.clean.is_some(),
            Hook::GetSources => self.get_sources.is_some(),
            Hook::PrepareSources => self.prepare_sources.is_some(),
        }
    }

    fn top(&self, view: &mut TopView<'_>) -> VersaResult<()> {
        let ctx = view.render_context();
        for (index, step) in self.top.iter().flatten().enumerate() {
            debug!(core = %view.core_name(), hook = "TOP", index, ?step, "Step");
            match step {
                TopStep::DefineTarget { name, params } => {
                    view.define_target(&ctx.render(name), render_params(&ctx, params))?;
                }
                TopStep::SetDefaultTarget(name) => {
                    view.set_default_target(&ctx.render(name))?;
                }
            }
        }
        Ok(())
    }

    fn create(&self, view: &mut CreateView<'_>, _params: &Params) -> VersaResult<()> {
        // Creation parameters are already in the render context.
        let ctx = view.render_context();
        for (index, step) in self.create.iter().enumerate() {
            debug!(core = %view.core_name(), hook = "CREATE", index, ?step, "Step");
            match step {
                CreateStep::DependOn(args) => {
                    view.depend_on(DependencyRequest {
                        name: args.name.as_deref().map(|n| ctx.render(n)),
                        version: args.version.as_deref().map(|v| ctx.render(v)),
                        repo: args.repo.as_deref().map(|r| ctx.render(r)),
                        params: render_params(&ctx, &args.params),
                    })?;
                }
                CreateStep::DependOnForeign { name, kind, params } => {
                    view.depend_on_foreign(ForeignDependency {
                        name: ctx.render(name),
                        kind: ctx.render(kind),
                        params: render_params(&ctx, params),
                    })?;
                }
                CreateStep::IsSingleton(flag) => view.is_singleton(*flag),
            }
        }
        Ok(())
    }

    async fn generate(&self, view: &mut GenerateView<'_>) -> VersaResult<()> {
        let ctx = view.render_context();
        for (index, step) in self.generate.iter().enumerate() {
            debug!(core = %view.core_name(), hook = "GENERATE", index, ?step, "Step");
            match step {
                GenerateStep::Run(command) => {
                    view.run_external_command(&ctx.render(command)).await?;
                }
                GenerateStep::AddFiles {
                    globs,
                    category,
                    use_in,
                } => {
                    let globs: Vec<String> = globs.iter().map(|g| ctx.render(g)).collect();
                    view.add_files(&globs, *category, *use_in)?;
                }
                GenerateStep::SetTop(path) => view.set_top(&ctx.render(path))?,
            }
        }
        Ok(())
    }

    async fn run_stage(&self, stage: Stage, view: &mut CommandView<'_>) -> VersaResult<()> {
        let ctx = view.render_context();
        for (index, CommandStep::Run(command)) in self.stage_steps(stage).iter().enumerate() {
            debug!(core = %view.core_name(), hook = %stage, index, command, "Step");
            view.run_external_command(&ctx.render(command)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step<T: for<'de> Deserialize<'de>>(src: &str) -> Result<T, toml::de::Error> {
        #[derive(Deserialize)]
        struct Wrapper<T> {
            step: T,
        }
        toml::from_str::<Wrapper<T>>(&format!("step = {src}")).map(|w| w.step)
    }

    #[test]
    fn parses_top_steps() {
        let define: TopStep =
            step(r#"{ define_target = { name = "sim", params = { width = 8, fast = true } } }"#)
                .unwrap();
        let mut params = Params::new();
        params.insert("width".into(), ParamValue::Integer(8));
        params.insert("fast".into(), ParamValue::Bool(true));
        assert_eq!(
            define,
            TopStep::DefineTarget {
                name: "sim".into(),
                params
            }
        );

        let default: TopStep = step(r#"{ set_default_target = "sim" }"#).unwrap();
        assert_eq!(default, TopStep::SetDefaultTarget("sim".into()));
    }

    #[test]
    fn depend_on_name_is_optional_at_parse_time() {
        let parsed: CreateStep = step(r#"{ depend_on = { version = "1.0" } }"#).unwrap();
        assert_eq!(
            parsed,
            CreateStep::DependOn(DependOnArgs {
                version: Some("1.0".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn add_files_parses_type_aliases() {
        let parsed: GenerateStep =
            step(r#"{ add_files = { globs = ["*.vhd"], type = "vhdl", use_in = "sim" } }"#)
                .unwrap();
        assert_eq!(
            parsed,
            GenerateStep::AddFiles {
                globs: vec!["*.vhd".into()],
                category: Some(FileCategory::HdlSource),
                use_in: Some(UsageContext::Simulation),
            }
        );
    }

    #[test]
    fn unknown_file_type_is_rejected() {
        let err = step::<GenerateStep>(r#"{ add_files = { globs = ["x"], type = "bogus" } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("Unknown file type 'bogus'"));
    }

    #[test]
    fn steps_are_scoped_to_their_hook() {
        assert!(step::<CreateStep>(r#"{ run = "make" }"#).is_err());
        assert!(step::<TopStep>(r#"{ depend_on = { name = "x" } }"#).is_err());
        assert!(step::<CommandStep>(r#"{ add_files = { globs = [] } }"#).is_err());
        assert!(step::<CommandStep>(r#"{ run = "make clean" }"#).is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(step::<CreateStep>(r#"{ depend_on = { name = "x", tag = "v1" } }"#).is_err());
    }

    #[test]
    fn has_hook_reflects_optional_hooks() {
        let program = ScriptProgram {
            clean: Some(vec![CommandStep::Run("rm -rf build".into())]),
            ..Default::default()
        };
        assert!(program.has_hook(Hook::Create));
        assert!(program.has_hook(Hook::Generate));
        assert!(program.has_hook(Hook::Clean));
        assert!(!program.has_hook(Hook::Top));
        assert!(!program.has_hook(Hook::GetSources));
        assert_eq!(program.stage_steps(Stage::Clean).len(), 1);
        assert!(program.stage_steps(Stage::PrepareSources).is_empty());
    }

    #[test]
    fn string_params_are_rendered() {
        let ctx = RenderContext::new().with_variable("CORE_NAME", "fifo");
        let mut params = Params::new();
        params.insert("prefix".into(), ParamValue::from("{{CORE_NAME}}_"));
        params.insert("depth".into(), ParamValue::Integer(4));

        let rendered = render_params(&ctx, &params);
        assert_eq!(rendered.get("prefix"), Some(&ParamValue::from("fifo_")));
        assert_eq!(rendered.get("depth"), Some(&ParamValue::Integer(4)));
    }
}
