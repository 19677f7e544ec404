use colored::Colorize;

use tcc_session::Command;

use super::Context;

pub fn run(ctx: &Context, name: Option<&str>) -> Result<(), String> {
    let mut session = super::open_session(ctx);

    if let Some(name) = name {
        return super::execute(
            ctx,
            &mut session,
            Command::RenameCampaign {
                name: name.to_string(),
            },
        );
    }

    let state = session.state();
    println!("  {}", state.campaign_name.bold());
    println!();

    let selected = state
        .selected_character()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "none".to_string());
    println!(
        "  characters:  {} (selected: {selected})",
        state.characters.len()
    );

    let tracker = &state.initiative;
    match tracker.current() {
        Some(c) => println!(
            "  initiative:  round {}, {} combatants, {}'s turn",
            tracker.round(),
            tracker.len(),
            c.name
        ),
        None => println!("  initiative:  {} combatants, not started", tracker.len()),
    }

    match state.dice_history.latest() {
        Some(roll) => println!(
            "  dice:        {} rolls, last {}",
            state.dice_history.len(),
            roll.summary()
        ),
        None => println!("  dice:        no rolls yet"),
    }

    Ok(())
}
