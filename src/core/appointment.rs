use crate::domain::model::{Appointment, AppointmentStatus};
use crate::domain::ports::Storage;
use crate::utils::error::{MaestroError, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Persists test-drive bookings as one pretty-printed JSON file each.
pub struct AppointmentManager<S: Storage> {
    storage: S,
}

impl<S: Storage> AppointmentManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn create_appointment_form(&self) -> Appointment {
        Appointment::default()
    }

    pub async fn save_appointment(&self, form: Appointment) -> Result<String> {
        self.save_appointment_at(form, Local::now()).await
    }

    /// Stamps id, creation time and `pending` status, then writes
    /// `appointment_{id}.json`. Bookings within the same second get a
    /// numeric suffix instead of overwriting each other.
    pub async fn save_appointment_at(
        &self,
        mut appointment: Appointment,
        now: DateTime<Local>,
    ) -> Result<String> {
        let base_id = now.format("%Y%m%d_%H%M%S").to_string();
        let mut id = base_id.clone();
        let mut suffix = 1;
        while self.storage.exists(&file_name(&id)).await {
            suffix += 1;
            id = format!("{}_{}", base_id, suffix);
        }

        appointment.appointment_id = Some(id.clone());
        appointment.created_at = Some(now.to_rfc3339());
        appointment.status = Some(AppointmentStatus::Pending);

        let file = file_name(&id);
        self.storage
            .write_file(&file, &to_pretty_json(&appointment)?)
            .await?;

        tracing::info!("Appointment saved: {}", file);
        Ok(file)
    }

    pub async fn load_appointment(&self, file: &str) -> Result<Appointment> {
        let data = self.storage.read_file(file).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn update_status(&self, file: &str, status: AppointmentStatus) -> Result<Appointment> {
        let mut appointment = self.load_appointment(file).await?;
        if appointment.appointment_id.is_none() {
            return Err(MaestroError::ProcessingError {
                message: format!("{} is not a saved appointment", file),
            });
        }
        appointment.status = Some(status);
        self.storage
            .write_file(file, &to_pretty_json(&appointment)?)
            .await?;
        tracing::info!("Appointment {} marked {:?}", file, status);
        Ok(appointment)
    }
}

fn file_name(id: &str) -> String {
    format!("appointment_{}.json", id)
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Blank answers are stored as `null`.
pub fn normalize_answer(answer: &str) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
