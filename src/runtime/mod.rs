//! Dialogue state machine
//!
//! `step` takes the session state, the stage graph and one event, and returns the
//! new state together with an `Output` describing what to render and which side
//! effects the host must run. Exactly one node is current at any time.

use crate::ledger::AnswerOutcome;
use crate::types::{
    event::Event,
    graph::{NodeKind, StageGraph},
    output::{Button, Effect, OverlayState, Output},
    progress::ProgressRecord,
    state::{Action, Affordance, Phase, State},
};
use crate::typewriter::{RevealStatus, substitute};
use debug::{DebugCategory, DebugConfig};
use log::Level;

pub mod debug;


pub const FINISH_LABEL: &str = "Finish stage";
pub const CONTINUE_LABEL: &str = "Continue";
pub const NEXT_LABEL: &str = "Next ▸";

/// Execute a single transition
pub fn step(state: State, graph: &StageGraph, event: Event) -> (State, Output) {
    step_with_debug(state, graph, event, &DebugConfig::default())
}

/// Execute a single transition with debug configuration
pub fn step_with_debug(
    mut state: State,
    graph: &StageGraph,
    event: Event,
    debug_config: &DebugConfig,
) -> (State, Output) {
    let mut output = Output::new();

    debug::log(
        debug_config,
        DebugCategory::Engine,
        Level::Trace,
        &format!("[Step] {:?} in {:?}", event, state.phase),
    );

    match (event, state.phase) {
        (_, Phase::Ended) => {
            debug::log(
                debug_config,
                DebugCategory::Flow,
                Level::Debug,
                &format!("[Flow] Stage already ended, ignoring {event:?}"),
            );
        }
        (Event::Start, Phase::Idle) => {
            enter_node(&mut state, graph, 0, &mut output, debug_config);
        }
        (Event::Tick, Phase::AtNode(_) | Phase::Feedback { .. }) => {
            let status = state.typewriter.tick();
            on_reveal(&mut state, graph, status, &mut output, debug_config);
        }
        (Event::Elapsed { ms }, Phase::AtNode(_) | Phase::Feedback { .. }) => {
            let status = state.typewriter.advance(ms);
            on_reveal(&mut state, graph, status, &mut output, debug_config);
        }
        (Event::Skip, Phase::AtNode(_) | Phase::Feedback { .. }) => {
            let status = state.typewriter.skip();
            on_reveal(&mut state, graph, status, &mut output, debug_config);
        }
        (Event::Choose { index }, Phase::AwaitingChoice(current)) => {
            choose(&mut state, graph, current, index, &mut output, debug_config);
        }
        _ => {
            debug::log(
                debug_config,
                DebugCategory::Flow,
                Level::Debug,
                &format!("[Flow] {:?} does not apply in {:?}", event, state.phase),
            );
        }
    }

    (state, output)
}

/// Tick until the running reveal (if any) completes, merging the outputs
///
/// Useful for hosts without a clock and for tests.
pub fn finish_reveal(
    mut state: State,
    graph: &StageGraph,
    debug_config: &DebugConfig,
) -> (State, Output) {
    let mut output = Output::new();
    while state.typewriter.is_typing() {
        let (next, out) = step_with_debug(state, graph, Event::Tick, debug_config);
        state = next;
        output.merge(out);
    }
    (state, output)
}

fn enter_node(
    state: &mut State,
    graph: &StageGraph,
    index: usize,
    output: &mut Output,
    debug_config: &DebugConfig,
) {
    let Some(node) = graph.get_node(index) else {
        debug::log(
            debug_config,
            DebugCategory::Flow,
            Level::Error,
            &format!("[Flow] Node {index} does not exist"),
        );
        return_to_menu(state, output);
        return;
    };

    debug::log(
        debug_config,
        DebugCategory::Engine,
        Level::Debug,
        &format!("[Engine] Entering node {index} ({:?})", node.kind),
    );

    state.phase = Phase::AtNode(index);
    state.pending.clear();
    output.hide_choices();

    output.overlay = Some(match &node.overlay {
        Some(text) => OverlayState::Shown(text.clone()),
        None => OverlayState::Hidden,
    });
    output.nameplate = Some(node.character.clone().unwrap_or_default());

    state.registry.position(&node.visible_names());
    if let Some(emotion) = node.emotion.as_deref() {
        match node.character.as_deref() {
            Some(speaker) => state.registry.set_emotion(speaker, Some(emotion)),
            None => debug::log(
                debug_config,
                DebugCategory::Engine,
                Level::Warn,
                &format!("[Engine] Node {index} sets emotion '{emotion}' without a character"),
            ),
        }
    }
    state.registry.highlight_speaker(node.character.as_deref());
    output.characters = Some(state.registry.slots().to_vec());

    match node.display_text() {
        Some(text) => {
            let text = substitute(text, &state.player_name);
            let speed = node.speed.unwrap_or(state.config.default_speed_ms);
            debug::log(
                debug_config,
                DebugCategory::Reveal,
                Level::Trace,
                &format!("[Reveal] {} chars at {speed}ms", text.chars().count()),
            );
            let status = state.typewriter.reveal(&text, speed);
            output.set_text(state.typewriter.visible(), state.typewriter.is_typing());
            on_reveal(state, graph, status, output, debug_config);
        }
        None => {
            state.typewriter.reveal("", state.config.default_speed_ms);
            output.set_text("", false);
            present_choices(state, graph, index, output);
        }
    }
}

fn on_reveal(
    state: &mut State,
    graph: &StageGraph,
    status: RevealStatus,
    output: &mut Output,
    debug_config: &DebugConfig,
) {
    match status {
        RevealStatus::Idle => {}
        RevealStatus::Typing => {
            output.set_text(state.typewriter.visible(), true);
        }
        RevealStatus::Completed => {
            output.set_text(state.typewriter.visible(), false);
            match state.phase {
                Phase::AtNode(index) => present_choices(state, graph, index, output),
                Phase::Feedback { node, next } => {
                    state.pending = vec![Affordance {
                        label: NEXT_LABEL.to_string(),
                        action: Action::AfterAnswer(next),
                    }];
                    state.phase = Phase::AwaitingChoice(node);
                    output.set_choices(vec![Button::proceed(NEXT_LABEL)]);
                }
                phase => debug::log(
                    debug_config,
                    DebugCategory::Reveal,
                    Level::Warn,
                    &format!("[Reveal] Completion in unexpected phase {phase:?}"),
                ),
            }
        }
    }
}

/// Offer the buttons of node `index` and wait for a click
fn present_choices(state: &mut State, graph: &StageGraph, index: usize, output: &mut Output) {
    let Some(node) = graph.get_node(index) else {
        return_to_menu(state, output);
        return;
    };

    let (pending, buttons): (Vec<_>, Vec<_>) = if node.is_end() {
        vec![(
            Affordance {
                label: FINISH_LABEL.to_string(),
                action: Action::Finish,
            },
            Button::proceed(FINISH_LABEL),
        )]
        .into_iter()
        .unzip()
    } else if node.choices.is_empty() {
        log::warn!("Node {index} has no choices, offering a continue button");
        vec![(
            Affordance {
                label: CONTINUE_LABEL.to_string(),
                action: Action::Continue(index + 1),
            },
            Button::proceed(CONTINUE_LABEL),
        )]
        .into_iter()
        .unzip()
    } else {
        node.choices
            .iter()
            .enumerate()
            .map(|(choice_index, choice)| {
                let action = match node.kind {
                    NodeKind::Quiz => Action::Answer(choice_index),
                    NodeKind::Line | NodeKind::End => Action::Goto(choice.next),
                };
                (
                    Affordance {
                        label: choice.text.clone(),
                        action,
                    },
                    Button::choice(choice.text.clone()),
                )
            })
            .unzip()
    };

    state.pending = pending;
    state.phase = Phase::AwaitingChoice(index);
    output.set_choices(buttons);
}

fn choose(
    state: &mut State,
    graph: &StageGraph,
    current: usize,
    index: usize,
    output: &mut Output,
    debug_config: &DebugConfig,
) {
    let Some(affordance) = state.pending.get(index).cloned() else {
        debug::log(
            debug_config,
            DebugCategory::Flow,
            Level::Warn,
            &format!(
                "[Flow] Button {index} is not offered ({} buttons)",
                state.pending.len()
            ),
        );
        return;
    };

    debug::log(
        debug_config,
        DebugCategory::Flow,
        Level::Debug,
        &format!(
            "[Flow] Node {current}: '{}' -> {:?}",
            affordance.label, affordance.action
        ),
    );

    match affordance.action {
        Action::Goto(next) => match graph.resolve(next) {
            Some(target) => enter_node(state, graph, target, output, debug_config),
            None => {
                debug::log(
                    debug_config,
                    DebugCategory::Flow,
                    Level::Error,
                    &format!("[Flow] next index {next} on node {current} is out of range"),
                );
                return_to_menu(state, output);
            }
        },
        Action::Continue(next) if next < graph.len() => {
            enter_node(state, graph, next, output, debug_config);
        }
        Action::Continue(_) => return_to_menu(state, output),
        Action::Answer(choice_index) => {
            answer(state, graph, current, choice_index, output, debug_config);
        }
        Action::AfterAnswer(next) => match graph.resolve(next) {
            Some(target) if graph.nodes[target].is_end() => {
                present_choices(state, graph, target, output);
            }
            Some(target) => enter_node(state, graph, target, output, debug_config),
            None => {
                debug::log(
                    debug_config,
                    DebugCategory::Flow,
                    Level::Error,
                    &format!("[Flow] quiz next index {next} on node {current} is out of range"),
                );
                return_to_menu(state, output);
            }
        },
        Action::Finish => finish_stage(state, output, debug_config),
    }
}

fn answer(
    state: &mut State,
    graph: &StageGraph,
    current: usize,
    choice_index: usize,
    output: &mut Output,
    debug_config: &DebugConfig,
) {
    let Some(node) = graph.get_node(current) else {
        return_to_menu(state, output);
        return;
    };
    let Some(choice) = node.choices.get(choice_index) else {
        return_to_menu(state, output);
        return;
    };

    let outcome = AnswerOutcome::from_flag(choice.is_correct);
    let points = state.progress.award_answer(outcome, &state.config);
    debug::log(
        debug_config,
        DebugCategory::Scoring,
        Level::Debug,
        &format!(
            "[Scoring] {outcome:?} answer on node {current}: +{points}, score {}",
            state.progress.score()
        ),
    );

    let response = match outcome {
        AnswerOutcome::Correct => format!(
            "🎉 {}",
            node.correct_response.as_deref().unwrap_or("Correct!")
        ),
        AnswerOutcome::Wrong => format!(
            "❌ {}",
            node.wrong_response.as_deref().unwrap_or("Wrong!")
        ),
        AnswerOutcome::Neutral => "Continue...".to_string(),
    };

    state.pending.clear();
    output.hide_choices();
    // Submitted before the response starts revealing.
    output.add_effect(Effect::SubmitScore(ProgressRecord::new(
        state.progress.score(),
        state.progress.highest_stage(),
    )));

    state.phase = Phase::Feedback {
        node: current,
        next: choice.next,
    };
    let response = substitute(&response, &state.player_name);
    let status = state
        .typewriter
        .reveal(&response, state.config.default_speed_ms);
    output.set_text(state.typewriter.visible(), state.typewriter.is_typing());
    on_reveal(state, graph, status, output, debug_config);
}

fn finish_stage(state: &mut State, output: &mut Output, debug_config: &DebugConfig) {
    let stage = state.stage;
    let completion = state.progress.complete_stage(stage, &state.config);

    debug::log(
        debug_config,
        DebugCategory::Scoring,
        Level::Info,
        &format!(
            "[Scoring] Stage {stage} finished (credited={}, new={}), submitting {:?}",
            completion.credited, completion.newly_completed, completion.submission
        ),
    );

    if completion.credited {
        output.add_effect(Effect::PersistRewards(
            state.progress.rewards().stages().collect(),
        ));
    }
    output.add_effect(Effect::SubmitScore(completion.submission));
    if completion.newly_completed && stage == state.config.last_stage() {
        output.add_effect(Effect::RevealPrize);
    }
    return_to_menu(state, output);
}

fn return_to_menu(state: &mut State, output: &mut Output) {
    state.phase = Phase::Ended;
    state.pending.clear();
    state.typewriter.skip();
    output.hide_choices();
    output.add_effect(Effect::ReturnToMenu);
}
