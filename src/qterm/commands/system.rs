use super::{CommandContext, CommandHandler};
use crate::error::Result;
use crate::surface::Theme;
use async_trait::async_trait;

pub struct Help;

#[async_trait(?Send)]
impl CommandHandler for Help {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: Vec<String>) -> Result<String> {
        Ok(ctx.registry.help_text())
    }
}

pub struct Clear;

#[async_trait(?Send)]
impl CommandHandler for Clear {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: Vec<String>) -> Result<String> {
        ctx.display.clear();
        Ok(String::new())
    }
}

pub struct SetTheme;

#[async_trait(?Send)]
impl CommandHandler for SetTheme {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: Vec<String>) -> Result<String> {
        let theme = Theme::from_name_or_default(args.first().map(String::as_str));
        ctx.theme.set_theme(theme);
        Ok(format!("Theme set to {}", theme))
    }
}
