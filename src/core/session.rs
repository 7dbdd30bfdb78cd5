use crate::core::appointment::{normalize_answer, AppointmentManager};
use crate::core::assistant::SalesAssistant;
use crate::core::intent::detect_test_drive_intent;
use crate::domain::ports::{ChatBackend, Storage};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];
const CLEAR_COMMAND: &str = "clear";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub turns: usize,
    pub appointments: Vec<String>,
}

/// Interactive chat loop. Reads customer lines from `input`, prints replies
/// to `output` and books a test drive when the customer accepts one.
pub struct Session<B: ChatBackend, S: Storage> {
    assistant: SalesAssistant<B>,
    appointments: AppointmentManager<S>,
}

impl<B: ChatBackend, S: Storage> Session<B, S> {
    pub fn new(assistant: SalesAssistant<B>, appointments: AppointmentManager<S>) -> Self {
        Self {
            assistant,
            appointments,
        }
    }

    pub fn assistant(&self) -> &SalesAssistant<B> {
        &self.assistant
    }

    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut last_response = String::new();

        writeln!(output, "\nCar Sales Assistant is ready!")?;
        writeln!(
            output,
            "You can ask about vehicle recommendations, specifications, pricing, and more."
        )?;
        writeln!(output, "Type 'exit' to end the conversation.")?;

        loop {
            let Some(line) = prompt_line(input, output, "\nYou: ")? else {
                break;
            };
            let user_input = line.trim();

            if user_input.is_empty() {
                continue;
            }
            if EXIT_COMMANDS.iter().any(|c| user_input.eq_ignore_ascii_case(c)) {
                break;
            }
            if user_input.eq_ignore_ascii_case(CLEAR_COMMAND) {
                self.assistant.clear_conversation();
                last_response.clear();
                writeln!(output, "\nConversation cleared.")?;
                continue;
            }

            let response = self.assistant.get_completion(user_input).await;
            summary.turns += 1;
            writeln!(output, "\n{}: {}", self.assistant.assistant_name(), response)?;

            if detect_test_drive_intent(&last_response, user_input) {
                tracing::info!("Test drive intent detected");
                if let Some(file) = self.book_test_drive(input, output).await? {
                    summary.appointments.push(file);
                }
            }

            last_response = response;
        }

        writeln!(output, "\nThank you for your time. Goodbye!")?;
        output.flush()?;
        Ok(summary)
    }

    async fn book_test_drive<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<String>> {
        writeln!(output, "\nLet's schedule your test drive!")?;
        writeln!(output, "\nPlease provide the following information:")?;

        let mut form = self.appointments.create_appointment_form();
        let fields: [(&str, &mut Option<String>); 5] = [
            ("Your name: ", &mut form.name),
            ("Contact number: ", &mut form.contact),
            ("Preferred time: ", &mut form.preferred_time),
            ("Vehicle of interest: ", &mut form.vehicle),
            ("Any additional notes (optional): ", &mut form.notes),
        ];
        for (label, slot) in fields {
            let Some(answer) = prompt_line(input, output, label)? else {
                tracing::warn!("Input ended during booking; appointment not saved");
                writeln!(output, "\nBooking cancelled.")?;
                return Ok(None);
            };
            *slot = normalize_answer(&answer);
        }

        match self.appointments.save_appointment(form).await {
            Ok(file) => {
                writeln!(output, "\nThank you! Your appointment has been scheduled.")?;
                Ok(Some(file))
            }
            Err(e) => {
                tracing::error!("Error saving appointment: {}", e);
                writeln!(output, "\nSorry, we could not save your appointment: {}", e)?;
                Ok(None)
            }
        }
    }
}

/// Prints `label` and reads one line. `None` on end of input.
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
