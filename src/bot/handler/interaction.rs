use serenity::all::{
    AutocompleteOption, CommandInteraction, Context, CreateAutocompleteResponse,
    CreateInteractionResponse, EditInteractionResponse, Interaction,
};

use crate::{
    bot::command::{reply::Reply, sticky, structure},
    state::BotState,
};

/// Handle slash commands and autocomplete requests from the managed guild
pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Command(command) => {
            if !is_managed(state, &command) {
                return;
            }
            handle_command(state, &ctx, command).await;
        }
        Interaction::Autocomplete(autocomplete) => {
            if !is_managed(state, &autocomplete) {
                return;
            }
            handle_autocomplete(state, &ctx, autocomplete).await;
        }
        _ => {}
    }
}

fn is_managed(state: &BotState, command: &CommandInteraction) -> bool {
    command
        .guild_id
        .is_some_and(|guild_id| guild_id.get() == state.guild_id)
}

async fn handle_command(state: &BotState, ctx: &Context, command: CommandInteraction) {
    let channel_id = command.channel_id.get();
    let author_id = command.user.id.get();
    let options = command.data.options();

    let reply = match command.data.name.as_str() {
        sticky::NAME => match sticky::parse(&options) {
            Some(parsed) => {
                Deferred::new(ctx, &command, false)
                    .run(sticky::execute(&state.sticky, channel_id, author_id, parsed))
                    .await
            }
            None => None,
        },
        structure::NAME => match structure::parse(&options) {
            Some(parsed) => {
                Deferred::new(ctx, &command, parsed.is_public())
                    .run(structure::execute(
                        &state.roster,
                        &state.reconciler,
                        author_id,
                        parsed,
                    ))
                    .await
            }
            None => None,
        },
        other => {
            tracing::warn!("Received unknown command /{}", other);
            return;
        }
    };

    let Some(reply) = reply else {
        tracing::debug!(
            "No response sent for /{} interaction",
            command.data.name
        );
        return;
    };

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(reply.to_embed()))
        .await
    {
        tracing::error!(
            "Failed to send response to /{}: {:?}",
            command.data.name,
            e
        );
    }
}

/// Acknowledges an interaction before running a command that may outlast
/// Discord's three second response window.
struct Deferred<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
    public: bool,
}

impl<'a> Deferred<'a> {
    fn new(ctx: &'a Context, command: &'a CommandInteraction, public: bool) -> Self {
        Self {
            ctx,
            command,
            public,
        }
    }

    /// Defers, then awaits `execute`. Returns `None` if the defer failed.
    async fn run(self, execute: impl std::future::Future<Output = Reply>) -> Option<Reply> {
        let deferred = if self.public {
            self.command.defer(&self.ctx.http).await
        } else {
            self.command.defer_ephemeral(&self.ctx.http).await
        };
        if let Err(e) = deferred {
            tracing::error!(
                "Failed to defer /{} interaction: {:?}",
                self.command.data.name,
                e
            );
            return None;
        }
        Some(execute.await)
    }
}

async fn handle_autocomplete(state: &BotState, ctx: &Context, autocomplete: CommandInteraction) {
    let Some(AutocompleteOption { value, .. }) = autocomplete.data.autocomplete() else {
        return;
    };
    let query = value.to_string();

    let options = autocomplete.data.options();
    let position = structure_position(&options);

    let choices = match state.roster.autocomplete(&query, position.as_deref()).await {
        Ok(choices) => choices,
        Err(e) => {
            tracing::warn!("Failed to build member autocomplete: {:?}", e);
            Vec::new()
        }
    };

    let response = choices
        .into_iter()
        .fold(CreateAutocompleteResponse::new(), |response, choice| {
            response.add_string_choice(choice.label, choice.value)
        });

    if let Err(e) = autocomplete
        .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
        .await
    {
        tracing::debug!("Failed to answer autocomplete: {:?}", e);
    }
}

/// Position the member id should be looked up in: `position`, or `from` when moving.
fn structure_position(options: &[serenity::all::ResolvedOption<'_>]) -> Option<String> {
    use crate::bot::command::options::{string, subcommand};

    let (_, sub) = subcommand(options)?;
    string(sub, "position")
        .or_else(|| string(sub, "from"))
        .map(str::to_string)
}
