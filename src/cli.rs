//! # CLI Module / 命令行模块
//!
//! Builds the localized `clap` command tree and dispatches to the
//! subcommands in [`commands`].
//!
//! 构建本地化的 `clap` 命令树并分派到 [`commands`] 中的子命令。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// Returns `None` when no `--lang` argument was given.
///
/// 预解析命令行参数以查找语言设置，以便在构建完整 CLI 之前初始化国际化。
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter().enumerate().find_map(|(pos, arg)| {
        if arg == "--lang" {
            args.get(pos + 1).cloned()
        } else {
            arg.strip_prefix("--lang=").map(str::to_string)
        }
    })
}

fn build_cli(locale: &str) -> Command {
    Command::new("check-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value("Checks.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help(t!("cli.arg_jobs", locale = locale).to_string())
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("cli.arg_json", locale = locale).to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_init_output", locale = locale).to_string())
                        .value_name("OUTPUT")
                        .default_value("Checks.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("cli.arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("render")
                .about(t!("cli.render_about", locale = locale).to_string())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help(t!("cli.arg_from", locale = locale).to_string())
                        .value_name("REPORT")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
}

/// Parses the process arguments and runs the selected subcommand.
/// 解析进程参数并运行所选子命令。
pub async fn run() -> Result<()> {
    // `--lang` wins; otherwise start from the system locale. `run` may still
    // switch to the suite's `language` once the suite is loaded.
    let explicit_lang = pre_parse_language();
    let language = match &explicit_lang {
        Some(lang) => crate::resolve_locale(lang),
        None => crate::init(),
    };
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    dispatch(&matches, &language, explicit_lang.is_some()).await
}

async fn dispatch(matches: &ArgMatches, language: &str, explicit_lang: bool) -> Result<()> {
    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = commands::run::RunArgs {
                config: run_matches
                    .get_one::<PathBuf>("config")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from("Checks.toml")),
                jobs: run_matches.get_one::<usize>("jobs").copied(),
                json: run_matches.get_one::<PathBuf>("json").cloned(),
                html: run_matches.get_one::<PathBuf>("html").cloned(),
                lang: explicit_lang.then(|| language.to_string()),
                fallback_lang: language.to_string(),
            };
            commands::run::execute(args).await
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("Checks.toml"));
            let non_interactive = init_matches.get_flag("non-interactive");
            let force = init_matches.get_flag("force");
            commands::init::execute(&output, non_interactive, force, language)
        }
        Some(("render", render_matches)) => {
            let from = render_matches
                .get_one::<PathBuf>("from")
                .cloned()
                .unwrap_or_default();
            let html = render_matches.get_one::<PathBuf>("html").cloned();
            commands::render::execute(&from, html.as_deref(), language)
        }
        // `subcommand_required` makes clap print help and exit before we get here.
        _ => Ok(()),
    }
}
