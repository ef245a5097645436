//! Shared veterinary-clinic schema for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use graft_fabricate::{Connectors, ContainerDefaults, Fabricator, MemoryStore};
use graft_schema::Schema;

pub const SOURCE_ID: i64 = -123;
pub const PRACTICE_ID: i64 = -456;

const CLINIC: &str = r#"
[models.source.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }

[models.enterprise.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }

[models.enterprise_membership.fields]
id = { type = "int", id = true }
enterprise_id = { type = "int", optional = true }
practice_id = { type = "int", optional = true }

[[models.enterprise_membership.relations]]
name = "enterprise"
target = "enterprise"
kind = "to_one"

[[models.enterprise_membership.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[models.practice.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }
source_id = { type = "int", optional = true }

[[models.practice.relations]]
name = "source"
target = "source"
kind = "to_one"

[models.client.fields]
id = { type = "int", id = true }
first_name = { type = "string" }
last_name = { type = "string" }
rank = { type = "int", optional = true }
practice_id = { type = "int", optional = true }
source_id = { type = "int", optional = true }

[[models.client.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[[models.client.relations]]
name = "source"
target = "source"
kind = "to_one"

[models.client_class.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }

[models.patient.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }
practice_id = { type = "int", optional = true }
source_id = { type = "int", optional = true }

[[models.patient.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[[models.patient.relations]]
name = "source"
target = "source"
kind = "to_one"

[models.owner.fields]
id = { type = "int", id = true }
percentage = { type = "int", optional = true }
client_id = { type = "int", optional = true }
patient_id = { type = "int", optional = true }
practice_id = { type = "int", optional = true }

[[models.owner.relations]]
name = "client"
target = "client"
kind = "to_one"

[[models.owner.relations]]
name = "patient"
target = "patient"
kind = "to_one"

[[models.owner.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[models.appointment.fields]
id = { type = "int", id = true }
notes = { type = "string", optional = true }
client_id = { type = "int", optional = true }
patient_id = { type = "int", optional = true }
practice_id = { type = "int", optional = true }

[[models.appointment.relations]]
name = "client"
target = "client"
kind = "to_one"

[[models.appointment.relations]]
name = "patient"
target = "patient"
kind = "to_one"

[[models.appointment.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[models.request.fields]
id = { type = "int", id = true }
content = { type = "json", optional = true }
practice_id = { type = "int", optional = true }
client_id = { type = "int", optional = true }

[[models.request.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[[models.request.relations]]
name = "client"
target = "client"
kind = "to_one"

[models.content.fields]
id = { type = "int", id = true }
body = { type = "text", optional = true }

[models.alert]
discriminator = "type"

[models.alert.fields]
id = { type = "int", id = true }
message = { type = "string", optional = true }
type = { type = "string", optional = true }
practice_id = { type = "int", optional = true }

[[models.alert.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[[models.alert.relations]]
name = "alertable"
target = "patient"
kind = "to_one"
polymorphic = true

[[models.alert.relations]]
name = "alertable_patient"
target = "patient"
kind = "to_one"

[[models.alert.relations]]
name = "alertable_client"
target = "client"
kind = "to_one"

[models.invalid_email_alert]
base = "alert"

[models.past_due_alert]
base = "alert"

[models.schedule.fields]
id = { type = "int", id = true }
practice_id = { type = "int", optional = true }

[[models.schedule.relations]]
name = "practice"
target = "practice"
kind = "to_one"

[models.schedule_category.fields]
id = { type = "int", id = true }
length = { type = "int", optional = true }
schedule_id = { type = "int", optional = true }

[[models.schedule_category.relations]]
name = "schedule"
target = "schedule"
kind = "to_one"

[models.report.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }

[[models.report.relations]]
name = "patients"
target = "patient"
kind = "many_to_many"

[models.user.fields]
id = { type = "int", id = true }
name = { type = "string", optional = true }
"#;

pub fn clinic_schema() -> Arc<Schema> {
    Arc::new(Schema::from_toml_str(CLINIC).expect("clinic schema parses"))
}

/// A fabricator configured the way an application suite would configure it:
/// implicit source/practice containers and the clinic's connector rules.
pub fn fabricator() -> Fabricator<MemoryStore> {
    Fabricator::new(clinic_schema())
        .with_containers(ContainerDefaults::new("source", SOURCE_ID).with_inner("practice", PRACTICE_ID))
        .with_connectors(
            Connectors::new()
                .rule("client", "patient", "owner")
                .rule("enterprise", "practice", "enterprise_membership"),
        )
}
