//! Interactive terminal chat loop.
//!
//! Drives a local `SessionController` directly -- no HTTP involved.
//! Plain input sends a message; slash commands switch mode, drive the
//! voice turn machine, and quit.

use std::io::Write as _;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use ease_core::bus::EventBus;
use ease_core::generator::ResponseGenerator;
use ease_core::session::SessionController;
use ease_core::voice::{VoiceToggle, VoiceTurnController};
use ease_infra::generator::{default_pool, CannedResponder, ScriptedResponder};
use ease_types::config::EaseConfig;
use ease_types::error::SessionError;
use ease_types::session::ChatMode;

/// Run the terminal chat session until the user quits.
pub async fn run(user: &str, scripted: bool, config: EaseConfig) -> anyhow::Result<()> {
    let bus = EventBus::new(16);
    if scripted {
        let generator = ScriptedResponder::new(default_pool());
        run_loop(SessionController::new(user, generator, config.clone(), bus), config).await
    } else {
        let generator = CannedResponder::new(config.response_delay_ms);
        run_loop(SessionController::new(user, generator, config.clone(), bus), config).await
    }
}

async fn run_loop<G: ResponseGenerator>(
    mut controller: SessionController<G>,
    config: EaseConfig,
) -> anyhow::Result<()> {
    let mut voice = VoiceTurnController::new(
        controller.id(),
        config,
        EventBus::new(16),
    );

    println!();
    println!(
        "  {} {}",
        style("🌱").bold(),
        style(&controller.messages()[0].content).cyan()
    );
    println!(
        "  {}",
        style("Type to talk. Commands: /mode, /voice, /quit").dim()
    );
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let prompt = match controller.mode() {
            ChatMode::Text => "you",
            ChatMode::Voice => "voice",
        };
        print!("  {} > ", style(prompt).magenta());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/mode" => {
                let next = match controller.mode() {
                    ChatMode::Text => ChatMode::Voice,
                    ChatMode::Voice => ChatMode::Text,
                };
                controller.set_mode(next);
                println!("  {}", style(format!("mode: {next}")).dim());
            }
            "/voice" => match voice.toggle() {
                Ok(VoiceToggle::StartedListening) => {
                    println!("  {}", style("🎤 Listening... /voice to stop").yellow());
                }
                Ok(VoiceToggle::StoppedListening) => {
                    println!("  {}", style("🤖 AI is responding...").cyan());
                    voice.run_playback().await;
                    println!("  {}", style("✨ Ready").dim());
                }
                Err(e) => println!("  {}", style(e.to_string()).red()),
            },
            "" => {}
            text => match controller.send_message(text).await {
                Ok(turn) => {
                    println!();
                    println!("  {} {}", style("🌱").bold(), turn.assistant.content);
                    if let Some(insight) = &turn.assistant.insight {
                        println!("  {} {}", style("💡").bold(), style(insight).yellow());
                    }
                    println!();
                }
                Err(SessionError::EmptyMessage) => {}
                Err(e) => println!("  {}", style(e.to_string()).red()),
            },
        }
    }

    controller.end();
    println!("  {}", style("Take care of yourself. 🌱").dim());
    Ok(())
}
