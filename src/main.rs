use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use word_wizard::cli::{CliInterface, parse_cli, report_load_error};
use word_wizard::game;
use word_wizard::logging::{default_log_path, init_logging};
use word_wizard::tui::TuiInterface;

fn main() -> ExitCode {
    let cli = parse_cli();
    let log_path = cli.log_file.clone().or_else(default_log_path);
    init_logging(log_path.as_deref());

    let graph = match cli.load_graph() {
        Ok(graph) => Arc::new(graph),
        Err(e) => {
            report_load_error(cli.words_path.as_deref(), &e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Loaded {} words", graph.len());

    let config = cli.game_config();
    if !cli.plain {
        match TuiInterface::new() {
            Ok(mut tui) => {
                game::run(graph, &config, cli.difficulty, &mut tui);
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                log::warn!("Full-screen interface unavailable ({e}), using plain mode");
            }
        }
    }

    let stdin = io::stdin();
    let mut plain = CliInterface::new(stdin.lock());
    game::run(graph, &config, cli.difficulty, &mut plain);
    ExitCode::SUCCESS
}
