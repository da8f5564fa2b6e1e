//! Interactive session: reads commands, drives the controller, prints the list.

use crate::command::{Command, CommandError, HELP};
use crate::render::render;
use optimist_runtime::{EffectHandle, StoreError};
use optimist_todos::{TodoController, TodoService};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S: TodoService + 'static> {
    controller: TodoController<S>,
    settle_timeout: Duration,
}

impl<S: TodoService + 'static> Session<S> {
    pub const fn new(controller: TodoController<S>, settle_timeout: Duration) -> Self {
        Self {
            controller,
            settle_timeout,
        }
    }

    pub const fn controller(&self) -> &TodoController<S> {
        &self.controller
    }

    /// Load the list, then process lines from `input` until `quit` or EOF
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails or the store stops accepting actions.
    pub async fn run<R>(&self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let handle = self.controller.load().await?;
        self.settle(handle).await;
        println!("{}", render(&self.controller.snapshot().await));

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command).await? == Flow::Quit {
                        break;
                    }
                },
                Err(CommandError::Empty) => {},
                Err(e) => println!("  {e}"),
            }
        }

        Ok(())
    }

    /// Run one command, printing the list as soon as it changes locally and
    /// again once the server has answered
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is shutting down.
    pub async fn execute(&self, command: Command) -> Result<Flow, StoreError> {
        let handle = match command {
            Command::Help => {
                println!("{HELP}");
                return Ok(Flow::Continue);
            },
            Command::Quit => return Ok(Flow::Quit),
            Command::List => {
                println!("{}", render(&self.controller.snapshot().await));
                return Ok(Flow::Continue);
            },
            Command::Add(title) => self.controller.create(title).await?,
            Command::Toggle(id) => self.controller.toggle(id).await?,
            Command::ToggleAll => self.controller.toggle_all().await?,
            Command::Remove(id) => self.controller.delete(id).await?,
            Command::Edit { id, title } => {
                self.controller.start_edit(id).await?;
                self.controller.edit_changed(title).await?;
                self.controller.commit_edit().await?
            },
            Command::Clear => self.controller.clear_completed().await?,
            Command::Filter(filter) => self.controller.set_filter(filter).await?,
            Command::Dismiss => self.controller.dismiss_error().await?,
        };

        let optimistic = self.controller.snapshot().await;
        println!("{}", render(&optimistic));

        self.settle(handle).await;
        let settled = self.controller.snapshot().await;
        if settled != optimistic {
            println!("{}", render(&settled));
        }

        Ok(Flow::Continue)
    }

    async fn settle(&self, mut handle: EffectHandle) {
        if handle.wait_with_timeout(self.settle_timeout).await.is_err() {
            tracing::warn!(
                timeout_ms = self.settle_timeout.as_millis(),
                "Server has not answered yet; pending todos stay marked"
            );
        }
    }
}
