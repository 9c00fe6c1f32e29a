//! Backend commands queued from UI to backend worker.

use contact_core::ContactConfig;
use shared::domain::FormField;

pub enum BackendCommand {
    UpdateField { field: FormField, value: String },
    SubmitForm,
    FetchSubmissions,
    ApplyConfig { config: ContactConfig },
}
