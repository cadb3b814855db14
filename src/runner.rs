use crate::client::PredictionClient;
use crate::config::Config;
use crate::form::{Form, FormError, Widget};
use crate::output;
use crate::presentation::{Presenter, View};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  set <field> <value>   type a number or pick an option
  up <field>            step a numeric field up
  down <field>          step a numeric field down
  open <field>          open/close a dropdown and list its options
  show                  show current form values
  submit                send the form for prediction
  help                  show this help
  quit                  leave the session
";

/// One line of input in an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: String, value: String },
    Step { field: String, up: bool },
    Open(String),
    Show,
    Submit,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let field = parts.next().map(str::to_string);
        let rest = parts.collect::<Vec<_>>().join(" ");

        let need_field = |field: Option<String>| field.ok_or_else(|| format!("usage: {} <field>", verb));

        let command = match verb {
            "set" => {
                let field = field.ok_or_else(|| "usage: set <field> <value>".to_string())?;
                Command::Set { field, value: rest }
            }
            "up" => Command::Step { field: need_field(field)?, up: true },
            "down" => Command::Step { field: need_field(field)?, up: false },
            "open" => Command::Open(need_field(field)?),
            "show" => Command::Show,
            "submit" => Command::Submit,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

/// Drives the form, the client and the presenter through submission cycles
pub struct Runner {
    form: Form,
    client: PredictionClient,
    presenter: Presenter,
}

impl Runner {
    /// Create a runner with the form pre-filled from the config profile
    pub fn new(config: &Config) -> Result<Self> {
        let client = PredictionClient::new(config.endpoint.clone(), config.timeout())?;
        let mut form = Form::new();
        for (field, value) in &config.profile {
            form.set(field, &value.to_string())
                .with_context(|| format!("Invalid profile entry '{}'", field))?;
        }
        info!(endpoint = %client.endpoint(), "runner ready");

        Ok(Self {
            form,
            client,
            presenter: Presenter::new(),
        })
    }

    #[cfg(test)]
    pub fn form(&self) -> &Form {
        &self.form
    }

    #[cfg(test)]
    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Apply `field=value` overrides on top of the profile
    pub fn apply_overrides(&mut self, overrides: &[String]) -> Result<()> {
        for entry in overrides {
            let (field, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Override '{}' is not in field=value form", entry))?;
            self.form
                .set(field.trim(), value.trim())
                .with_context(|| format!("Invalid override '{}'", entry))?;
        }
        Ok(())
    }

    /// Run one submission cycle and return what ended up on screen.
    ///
    /// Takes `&mut self`, so submissions from one runner never overlap.
    pub async fn submit(&mut self) -> View {
        let submission = self.presenter.begin_submit();
        self.form.dismiss_dropdowns();

        let record = self.form.collect();
        debug!(fields = record.len(), "form collected");
        let outcome = self.client.submit(&record).await;

        submission.finish(outcome)
    }

    /// Read commands line by line until `quit` or end of input
    pub async fn run_session<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Predicting against {}", self.client.endpoint())?;
        write!(out, "{}", output::format_plain(&self.presenter.view()))?;
        writeln!(out, "Type 'help' for commands.")?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command, out).await?,
                Ok(None) => {}
                Err(message) => writeln!(out, "{}", message)?,
            }
        }
        Ok(())
    }

    async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        let result = match command {
            Command::Set { field, value } => self.form.set(&field, &value),
            Command::Step { field, up } => self.form.step(&field, up),
            Command::Open(field) => self.toggle_dropdown(&field, out)?,
            Command::Show => {
                write!(out, "{}", output::format_form(&self.form))?;
                Ok(())
            }
            Command::Submit => {
                writeln!(out, "Predicting...")?;
                let view = self.submit().await;
                write!(out, "{}", output::format_plain(&view))?;
                Ok(())
            }
            Command::Help => {
                write!(out, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => Ok(()),
        };

        if let Err(e) = result {
            writeln!(out, "{}", e)?;
        }
        Ok(())
    }

    fn toggle_dropdown<W: Write>(&mut self, field: &str, out: &mut W) -> Result<Result<(), FormError>> {
        let dropdown = match self.form.widget_mut(field) {
            Ok(Widget::Choice(dropdown)) => dropdown,
            Ok(Widget::Number(_)) => return Ok(Err(FormError::NotDropdown(field.to_string()))),
            Err(e) => return Ok(Err(e)),
        };

        dropdown.toggle();
        if dropdown.is_open() {
            for option in dropdown.field().options {
                let marker = if *option == dropdown.selected() { "*" } else { " " };
                writeln!(out, " {} {}", marker, option)?;
            }
        }
        Ok(Ok(()))
    }
}
