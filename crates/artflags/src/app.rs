use anyhow::{Context, Result, bail};
use artflags::{BuildConfig, EnvOverrides, FlagContext, MakeVars, ModuleFlags, ProcessEnv};

use crate::cli::{Cli, Cmd, Format};

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let overrides = effective_overrides(&config, &cli.set)?;

    let out = match cli.cmd {
        Cmd::Flags {
            device,
            host,
            format,
        } => {
            let ctx = FlagContext::new(overrides);
            // Plain `flags` means a device module.
            let device = device || !host;
            let flags = ctx.module_flags(&config.descriptor(host, device));
            render_flags(&flags, format)?
        }
        Cmd::Makevars => make_vars(&config)?.render(),
        Cmd::Env => render_env(&overrides),
    };

    print!("{out}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<BuildConfig> {
    match &cli.config {
        Some(path) => {
            let config = BuildConfig::load(path)?;
            log::info!("loaded build config from {}", path.display());
            Ok(config)
        }
        None => Ok(BuildConfig::default()),
    }
}

fn effective_overrides(config: &BuildConfig, set: &[String]) -> Result<EnvOverrides> {
    let mut extra = Vec::with_capacity(set.len());
    for s in set {
        let Some(pair) = artflags::env::parse_assignment(s) else {
            bail!("--set expects KEY=VALUE, got '{s}'");
        };
        extra.push(pair);
    }
    Ok(config.overrides_from(&ProcessEnv, extra))
}

fn make_vars(config: &BuildConfig) -> Result<MakeVars> {
    let table = config.toolchain_table()?;
    let mut vars = MakeVars::new();
    artflags::emit_make_vars(config, &table, &mut vars).with_context(|| {
        format!(
            "Resolving the {} toolchain for {}",
            config.default_target,
            artflags::vars::TESTCASES_CONTENT_VAR
        )
    })?;
    Ok(vars)
}

fn render_flags(flags: &ModuleFlags, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(format!(
            "cflags: {}\nasflags: {}\n",
            flags.cflags.join(" "),
            flags.asflags.join(" ")
        )),
        Format::Json => {
            let mut s = serde_json::to_string_pretty(flags)?;
            s.push('\n');
            Ok(s)
        }
    }
}

fn render_env(overrides: &EnvOverrides) -> String {
    overrides
        .iter()
        .map(|(k, v)| format!("{k}={v}\n"))
        .collect()
}
