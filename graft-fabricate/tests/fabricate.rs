//! End-to-end fabrication tests against the clinic schema.

mod common;

use common::{fabricator, PRACTICE_ID, SOURCE_ID};
use graft_fabricate::{spec, FabricateError, SpecMap, StoreError, Value};
use pretty_assertions::assert_eq;

// ----- return values -----

#[test]
fn returns_top_object_from_single_tree() {
    let fab = fabricator();
    let result = fab.fabricate(spec! { practice: { id: 5, client: {} } }).unwrap();
    let practice = result.one().unwrap();
    assert_eq!(practice.model(), "practice");
    assert_eq!(practice.get_int("id"), Some(5));
}

#[test]
fn returns_first_tree_from_list_of_trees() {
    let fab = fabricator();
    let result = fab
        .fabricate(spec! {
            client: { last_name: "Suzuki" },
            client_class: {},
        })
        .unwrap();
    assert_eq!(result.one().unwrap().get_str("last_name"), Some("Suzuki"));
}

#[test]
fn returns_first_object_from_first_array() {
    let fab = fabricator();
    let result = fab
        .fabricate(spec! {
            clients: [
                { last_name: "Aaaa" },
                { last_name: "Bbbb" },
                { last_name: "Cccc" },
            ],
            client_class: [{}, {}],
        })
        .unwrap();
    assert_eq!(result.one().unwrap().get_str("last_name"), Some("Aaaa"));
    assert_eq!(fab.store().count("client"), 3);
    assert_eq!(fab.store().count("client_class"), 2);
}

#[test]
fn returns_marked_object() {
    let fab = fabricator();
    let result = fab
        .fabricate(spec! {
            client: { patient: { appointment: { RETURN: true } } },
        })
        .unwrap();
    assert_eq!(result.one().unwrap().model(), "appointment");

    let result = fab
        .fabricate(spec! {
            client: { patient: { RETURN: true, appointment: {} } },
        })
        .unwrap();
    assert_eq!(result.one().unwrap().model(), "patient");
}

#[test]
fn returns_list_of_marked_objects() {
    let fab = fabricator();
    let result = fab
        .fabricate(spec! {
            client: { patient: { appointments: [
                { notes: "hi", RETURN: true },
                { notes: "there", RETURN: true },
            ] } },
        })
        .unwrap();
    let apps = result.many().unwrap();
    assert_eq!(apps[0].get_str("notes"), Some("hi"));
    assert_eq!(apps[1].get_str("notes"), Some("there"));

    let result = fab
        .fabricate(spec! {
            client: {
                RETURN: true,
                patient: {
                    RETURN: true,
                    appointments: [
                        { notes: "hi" },
                        { notes: "there" },
                    ],
                },
            },
        })
        .unwrap();
    let pair = result.many().unwrap();
    assert_eq!(pair[0].model(), "client");
    assert_eq!(pair[1].model(), "patient");
}

#[test]
fn returns_mapping_of_keyed_objects() {
    let fab = fabricator();
    let result = fab
        .fabricate(spec! {
            client: {
                RETURN: val_1,
                patient: {
                    RETURN: a_patient,
                    appointments: [
                        { notes: "hi", RETURN: stuff },
                        { notes: "there" },
                    ],
                },
            },
        })
        .unwrap();
    assert_eq!(result.get("val_1").unwrap().model(), "client");
    assert_eq!(result.get("a_patient").unwrap().model(), "patient");
    assert_eq!(result.get("stuff").unwrap().get_str("notes"), Some("hi"));
}

#[test]
fn mixing_positional_and_keyed_returns_fails() {
    let fab = fabricator();
    let err = fab
        .fabricate(spec! {
            client: { RETURN: true, patient: { RETURN: stuff } },
        })
        .unwrap_err();
    assert!(matches!(err, FabricateError::MixedReturns));
}

// ----- container assignment -----

#[test]
fn default_practice_is_created() {
    let fab = fabricator();
    fab.fabricate(spec! { client: {} }).unwrap();
    assert_eq!(fab.store().first("practice").unwrap().get_int("id"), Some(PRACTICE_ID));
}

#[test]
fn default_practice_is_linked_when_practice_is_not_a_parent() {
    let fab = fabricator();
    fab.fabricate(spec! { client: {} }).unwrap();
    assert_eq!(
        fab.store().first("client").unwrap().get_int("practice_id"),
        Some(PRACTICE_ID)
    );
}

#[test]
fn parent_practice_is_linked() {
    let fab = fabricator();
    fab.fabricate(spec! { practice: { id: 7, client: {} } }).unwrap();
    assert_eq!(fab.store().first("client").unwrap().get_int("practice_id"), Some(7));
}

#[test]
fn explicit_foreign_key_wins_over_parent() {
    let fab = fabricator();
    fab.fabricate(spec! { practice: { id: 2 } }).unwrap();
    fab.fabricate(spec! { practice: { id: 3, client: { practice_id: 2 } } })
        .unwrap();
    assert_eq!(fab.store().first("client").unwrap().get_int("practice_id"), Some(2));
}

#[test]
fn explicit_entity_value_wins_over_parent() {
    let fab = fabricator();
    let practice = fab
        .fabricate(spec! { practice: { id: 2 } })
        .unwrap()
        .into_one()
        .unwrap();
    fab.fabricate(spec! { practice: { id: 3, client: { practice: &practice } } })
        .unwrap();
    assert_eq!(fab.store().first("client").unwrap().get_int("practice_id"), Some(2));
}

#[test]
fn explicit_source_still_gets_default_practice() {
    let fab = fabricator();
    fab.fabricate(spec! { source: { id: 2, client: {} } }).unwrap();
    assert_eq!(fab.store().count("source"), 1);
    assert_eq!(fab.store().count("practice"), 1);
    assert_eq!(fab.store().first("practice").unwrap().get_int("source_id"), Some(2));
    assert_eq!(
        fab.store().first("client").unwrap().get_int("practice_id"),
        Some(PRACTICE_ID)
    );
}

#[test]
fn sentinel_containers_are_reused_across_runs() {
    let fab = fabricator();
    fab.fabricate(spec! { client: {} }).unwrap();
    fab.fabricate(spec! { patient: {} }).unwrap();
    assert_eq!(fab.store().count("source"), 1);
    assert_eq!(fab.store().count("practice"), 1);
    assert_eq!(
        fab.store().first("patient").unwrap().get_int("practice_id"),
        Some(PRACTICE_ID)
    );
}

#[test]
fn defaults_wrap_trees_that_mention_neither_container() {
    let fab = fabricator();
    fab.fabricate(spec! { enterprise: { source: { practice: {} } } })
        .unwrap();
    assert_eq!(fab.store().count("source"), 2);
    assert_eq!(fab.store().count("practice"), 2);
}

#[test]
fn no_defaults_skips_containers() {
    let fab = fabricator();
    fab.fabricate(spec! {
        NO_DEFAULTS: true,
        enterprise: { source: { practice: {} } },
    })
    .unwrap();
    assert_eq!(fab.store().count("source"), 1);
    assert_eq!(fab.store().count("practice"), 1);
}

// ----- child connections -----

#[test]
fn children_link_to_their_parent() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { appointment: {} } }).unwrap();
    let patient = fab.store().first("patient").unwrap();
    let appointment = fab.store().first("appointment").unwrap();
    assert_eq!(appointment.get_int("patient_id"), patient.get_int("id"));
}

#[test]
fn children_share_the_parents_practice() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { appointment: {} } }).unwrap();
    assert_eq!(
        fab.store().first("appointment").unwrap().get_int("practice_id"),
        Some(PRACTICE_ID)
    );

    fab.fabricate(spec! { practice: { id: 4, patient: { appointment: {} } } })
        .unwrap();
    assert_eq!(
        fab.store().last("appointment").unwrap().get_int("practice_id"),
        Some(4)
    );
}

#[test]
fn existing_entity_becomes_the_parent() {
    let fab = fabricator();
    let practice = fab
        .fabricate(spec! { practice: { id: 9 } })
        .unwrap()
        .into_one()
        .unwrap();
    fab.fabricate(spec! { practice: { EXISTING: practice, client: {} } })
        .unwrap();
    assert_eq!(fab.store().first("client").unwrap().get_int("practice_id"), Some(9));
    assert_eq!(fab.store().count("practice"), 1);
}

// ----- polymorphic owners -----

#[test]
fn alerts_tie_to_clients() {
    let fab = fabricator();
    fab.fabricate(spec! { client: { alert: { type: "InvalidEmailAlert" } } })
        .unwrap();
    let client = fab.store().first("client").unwrap();
    let alert = fab.store().first("alert").unwrap();
    assert_eq!(alert.get_int("alertable_id"), client.get_int("id"));
    assert_eq!(alert.get_str("alertable_type"), Some("Client"));
    assert_eq!(alert.get_str("type"), Some("InvalidEmailAlert"));
    assert_eq!(alert.model(), "invalid_email_alert");
}

#[test]
fn alerts_tie_to_the_nearest_ancestor() {
    let fab = fabricator();
    fab.fabricate(spec! { client: { patient: { alert: { type: "PastDueAlert" } } } })
        .unwrap();
    let patient = fab.store().first("patient").unwrap();
    let alert = fab.store().first("alert").unwrap();
    assert_eq!(alert.get_int("alertable_id"), patient.get_int("id"));
    assert_eq!(alert.get_str("alertable_type"), Some("Patient"));
}

#[test]
fn typed_shadows_of_a_polymorphic_link_are_skipped() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { alert: {} } }).unwrap();
    let alert = fab.store().first("alert").unwrap();
    assert!(alert.get("alertable_patient_id").is_none());
    assert!(alert.get("alertable_client_id").is_none());
    assert_eq!(
        alert.get_int("alertable_id"),
        fab.store().first("patient").unwrap().get_int("id")
    );
}

#[test]
fn unresolvable_discriminator_stays_a_literal() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { alert: { type: "NoSuchAlert" } } })
        .unwrap();
    let alert = fab.store().first("alert").unwrap();
    assert_eq!(alert.model(), "alert");
    assert_eq!(alert.get_str("type"), Some("NoSuchAlert"));
}

// ----- shared parents -----

#[test]
fn appointment_ties_to_patient_under_client() {
    let fab = fabricator();
    fab.fabricate(spec! { client: { patient: { appointment: {} } } })
        .unwrap();
    let appointment = fab.store().first("appointment").unwrap();
    assert_eq!(
        appointment.get_int("client_id"),
        fab.store().first("client").unwrap().get_int("id")
    );
    assert_eq!(
        appointment.get_int("patient_id"),
        fab.store().first("patient").unwrap().get_int("id")
    );
}

#[test]
fn appointment_ties_to_client_under_patient() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { client: { appointment: {} } } })
        .unwrap();
    let appointment = fab.store().first("appointment").unwrap();
    assert_eq!(
        appointment.get_int("client_id"),
        fab.store().first("client").unwrap().get_int("id")
    );
    assert_eq!(
        appointment.get_int("patient_id"),
        fab.store().first("patient").unwrap().get_int("id")
    );
}

#[test]
fn join_relation_collects_ancestor_keys() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { report: {} } }).unwrap();
    let patient = fab.store().first("patient").unwrap();
    let report = fab.store().first("report").unwrap();
    assert_eq!(
        report.get("patients"),
        Some(&Value::List(vec![Value::Int(patient.get_int("id").unwrap())]))
    );
}

// ----- implicit connectors -----

#[test]
fn owner_is_created_for_patient_under_client() {
    let fab = fabricator();
    fab.fabricate(spec! { client: { patient: {} } }).unwrap();
    let owner = fab.store().first("owner").unwrap();
    assert_eq!(owner.get_int("client_id"), fab.store().first("client").unwrap().get_int("id"));
    assert_eq!(owner.get_int("patient_id"), fab.store().first("patient").unwrap().get_int("id"));
}

#[test]
fn owner_is_created_for_client_under_patient() {
    let fab = fabricator();
    fab.fabricate(spec! { patient: { client: {} } }).unwrap();
    let owner = fab.store().first("owner").unwrap();
    assert_eq!(owner.get_int("client_id"), fab.store().first("client").unwrap().get_int("id"));
    assert_eq!(owner.get_int("patient_id"), fab.store().first("patient").unwrap().get_int("id"));
}

#[test]
fn explicit_owner_is_kept() {
    let fab = fabricator();
    fab.fabricate(spec! { client: { patient: { owner: { percentage: 50 } } } })
        .unwrap();
    assert_eq!(fab.store().count("owner"), 1);
    let owner = fab.store().first("owner").unwrap();
    assert_eq!(owner.get_int("percentage"), Some(50));
    assert_eq!(owner.get_int("client_id"), fab.store().first("client").unwrap().get_int("id"));
    assert_eq!(owner.get_int("patient_id"), fab.store().first("patient").unwrap().get_int("id"));
}

#[test]
fn membership_is_created_for_practice_under_enterprise() {
    let fab = fabricator();
    fab.fabricate(spec! {
        NO_DEFAULTS: true,
        source: { enterprise: { practice: {} } },
    })
    .unwrap();
    let membership = fab.store().first("enterprise_membership").unwrap();
    assert_eq!(
        membership.get_int("enterprise_id"),
        fab.store().first("enterprise").unwrap().get_int("id")
    );
    assert_eq!(
        membership.get_int("practice_id"),
        fab.store().first("practice").unwrap().get_int("id")
    );
}

// ----- direct model references -----

#[test]
fn direct_model_reference_creates_the_entity() {
    let fab = fabricator();
    fab.fabricate(SpecMap::new().model_child("schedule", SpecMap::new()))
        .unwrap();
    assert_eq!(fab.store().count("schedule"), 1);
}

#[test]
fn direct_model_reference_links_associations() {
    let fab = fabricator();
    fab.fabricate(spec! { schedule: { @schedule_category: { length: 20 } } })
        .unwrap();
    let category = fab.store().first("schedule_category").unwrap();
    assert_eq!(category.get_int("length"), Some(20));
    assert_eq!(
        category.get_int("schedule_id"),
        fab.store().first("schedule").unwrap().get_int("id")
    );
}

// ----- mixed and awkward shapes -----

#[test]
fn unrelated_models_are_left_unlinked() {
    let fab = fabricator();
    fab.fabricate(spec! {
        practice: { id: 6, client: { patient: { appointment: {} } } },
        user: { name: "bob" },
    })
    .unwrap();
    assert_eq!(fab.store().first("client").unwrap().get_int("practice_id"), Some(6));
    assert_eq!(fab.store().first("patient").unwrap().get_int("practice_id"), Some(6));
    assert_eq!(fab.store().first("appointment").unwrap().get_int("practice_id"), Some(6));
    assert!(fab.store().first("user").unwrap().get("practice_id").is_none());
}

#[test]
fn plural_tokens_resolve() {
    let fab = fabricator();
    fab.fabricate(spec! {
        patients: [
            { appointment: {} },
            { appointment: {} },
        ],
    })
    .unwrap();
    assert_eq!(fab.store().count("patient"), 2);
    assert_eq!(fab.store().count("appointment"), 2);
}

#[test]
fn list_siblings_share_the_same_parent() {
    let fab = fabricator();
    fab.fabricate(spec! {
        patients: [
            { appointment: {} },
            { appointment: {} },
        ],
    })
    .unwrap();
    let patients = fab.store().all("patient");
    let appointments = fab.store().all("appointment");
    assert_eq!(appointments[0].get_int("patient_id"), patients[0].get_int("id"));
    assert_eq!(appointments[1].get_int("patient_id"), patients[1].get_int("id"));
    assert_eq!(patients[0].get_int("practice_id"), patients[1].get_int("practice_id"));
}

#[test]
fn nested_data_on_a_column_stays_serialized() {
    let fab = fabricator();
    fab.fabricate(spec! {
        request: {
            content: {
                date: "10/31/2018",
                comment: "I want an appointment on Halloween!",
            },
        },
    })
    .unwrap();
    assert_eq!(fab.store().count("content"), 0);
    let request = fab.store().first("request").unwrap();
    let Some(Value::Json(content)) = request.get("content") else {
        panic!("expected serialized content");
    };
    assert_eq!(
        content["comment"],
        serde_json::json!("I want an appointment on Halloween!")
    );
}

#[test]
fn sentinel_source_links_descendants() {
    let fab = fabricator();
    fab.fabricate(spec! { client: {} }).unwrap();
    let client = fab.store().first("client").unwrap();
    assert_eq!(client.get_int("source_id"), Some(SOURCE_ID));
}

#[test]
fn unresolvable_nested_token_is_rejected_by_the_store() {
    let fab = fabricator();
    let err = fab.fabricate(spec! { client: { wibble: {} } }).unwrap_err();
    match err {
        FabricateError::Creation { model, source } => {
            assert_eq!(model, "client");
            assert!(matches!(source, StoreError::UnknownColumn { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}
