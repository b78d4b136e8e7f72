// Integration tests for the Convene API
// Run with a live server and database:
//   cargo test --test integration_test -- --ignored

use convene_contracts::{AuthResponse, Event, MyRsvpsResponse, Participant, ParticipantsResponse};
use serde_json::json;
use uuid::Uuid;

const API_BASE_URL: &str = "http://localhost:9000";

/// Register a fresh user and return (token, user id)
async fn register_user(client: &reqwest::Client, name: &str) -> AuthResponse {
    let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::now_v7());

    let response = client
        .post(format!("{}/auth/register", API_BASE_URL))
        .json(&json!({
            "email": email,
            "name": name,
            "password": "correct horse battery staple"
        }))
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(response.status(), 201, "registration should succeed");
    response.json().await.expect("Failed to parse auth response")
}

async fn create_event(
    client: &reqwest::Client,
    token: &str,
    title: &str,
    max_participants: Option<i32>,
) -> Event {
    let mut body = json!({
        "title": title,
        "description": "integration test event",
        "date": "2030-06-01T18:00:00Z",
        "location": "Room A"
    });
    if let Some(cap) = max_participants {
        body["maxParticipants"] = json!(cap);
    }

    let response = client
        .post(format!("{}/events", API_BASE_URL))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to create event");

    assert_eq!(response.status(), 201, "event creation should succeed");
    response.json().await.expect("Failed to parse event")
}

async fn rsvp(client: &reqwest::Client, token: &str, event_id: Uuid) -> reqwest::Response {
    client
        .post(format!("{}/participants", API_BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "eventId": event_id }))
        .send()
        .await
        .expect("Failed to send RSVP request")
}

#[tokio::test]
#[ignore]
async fn test_health_endpoint() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", API_BASE_URL))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore]
async fn test_requests_without_token_are_rejected() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/events", API_BASE_URL))
        .send()
        .await
        .expect("Failed to list events");

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.expect("Failed to parse error body");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_full_rsvp_workflow() {
    let client = reqwest::Client::new();

    // Creator and two attendees
    let creator = register_user(&client, "Creator").await;
    let alice = register_user(&client, "Alice").await;
    let bob = register_user(&client, "Bob").await;
    let carol = register_user(&client, "Carol").await;

    // Capacity-2 event
    let event = create_event(&client, &creator.token, "Standup", Some(2)).await;
    assert_eq!(event.max_participants, Some(2));
    assert_eq!(event.created_by, creator.user.id);

    // Two RSVPs fit
    let first = rsvp(&client, &alice.token, event.id).await;
    assert_eq!(first.status(), 201);
    let first: Participant = first.json().await.expect("Failed to parse participant");
    assert_eq!(first.event_id, event.id);
    assert_eq!(first.user_id, alice.user.id);
    assert_eq!(first.event_title, "Standup");

    let second = rsvp(&client, &bob.token, event.id).await;
    assert_eq!(second.status(), 201);

    // Duplicate RSVP is rejected
    let duplicate = rsvp(&client, &alice.token, event.id).await;
    assert_eq!(duplicate.status(), 400);
    let body: serde_json::Value = duplicate.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "you have already RSVP'd to this event");

    // Third attendee bounces off the capacity
    let full = rsvp(&client, &carol.token, event.id).await;
    assert_eq!(full.status(), 400);
    let body: serde_json::Value = full.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "event is full");

    // Participant list reflects both RSVPs
    let list: ParticipantsResponse = client
        .get(format!("{}/participants/event/{}", API_BASE_URL, event.id))
        .bearer_auth(&creator.token)
        .send()
        .await
        .expect("Failed to list participants")
        .json()
        .await
        .expect("Failed to parse participants");
    assert_eq!(list.count, 2);
    assert_eq!(list.participants.len(), 2);

    // Bob cannot cancel Alice's RSVP by id
    let forbidden = client
        .delete(format!("{}/participants/{}", API_BASE_URL, first.id))
        .bearer_auth(&bob.token)
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(forbidden.status(), 403);

    // Nor by pair
    let forbidden = client
        .delete(format!(
            "{}/participants/event/{}/user/{}",
            API_BASE_URL, event.id, alice.user.id
        ))
        .bearer_auth(&bob.token)
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(forbidden.status(), 403);

    // Alice cancels herself by pair
    let cancelled = client
        .delete(format!(
            "{}/participants/event/{}/user/{}",
            API_BASE_URL, event.id, alice.user.id
        ))
        .bearer_auth(&alice.token)
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(cancelled.status(), 200);

    // Cancelling again yields 404
    let missing = client
        .delete(format!(
            "{}/participants/event/{}/user/{}",
            API_BASE_URL, event.id, alice.user.id
        ))
        .bearer_auth(&alice.token)
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(missing.status(), 404);

    // The freed slot admits Carol now
    let retried = rsvp(&client, &carol.token, event.id).await;
    assert_eq!(retried.status(), 201);

    // Only the creator may update; a title change leaves RSVPs alone
    let forbidden = client
        .put(format!("{}/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.token)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .expect("Failed to update event");
    assert_eq!(forbidden.status(), 403);

    let updated: Event = client
        .put(format!("{}/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&creator.token)
        .json(&json!({ "title": "Daily Standup" }))
        .send()
        .await
        .expect("Failed to update event")
        .json()
        .await
        .expect("Failed to parse event");
    assert_eq!(updated.title, "Daily Standup");
    assert_eq!(updated.max_participants, Some(2));
    assert_eq!(updated.location, "Room A");

    let list: ParticipantsResponse = client
        .get(format!("{}/participants/event/{}", API_BASE_URL, event.id))
        .bearer_auth(&creator.token)
        .send()
        .await
        .expect("Failed to list participants")
        .json()
        .await
        .expect("Failed to parse participants");
    assert_eq!(list.count, 2);

    // Only the creator may delete
    let forbidden = client
        .delete(format!("{}/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&bob.token)
        .send()
        .await
        .expect("Failed to delete event");
    assert_eq!(forbidden.status(), 403);

    let deleted = client
        .delete(format!("{}/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&creator.token)
        .send()
        .await
        .expect("Failed to delete event");
    assert_eq!(deleted.status(), 200);

    // Cascade removed Bob's RSVP too
    let rsvps: MyRsvpsResponse = client
        .get(format!("{}/participants/my-rsvps", API_BASE_URL))
        .bearer_auth(&bob.token)
        .send()
        .await
        .expect("Failed to list my rsvps")
        .json()
        .await
        .expect("Failed to parse my rsvps");
    assert!(rsvps.rsvps.iter().all(|p| p.event_id != event.id));

    // And the event itself is gone
    let gone = client
        .get(format!("{}/events/{}", API_BASE_URL, event.id))
        .bearer_auth(&creator.token)
        .send()
        .await
        .expect("Failed to get event");
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_cancel_missing_rsvp_is_404() {
    let client = reqwest::Client::new();
    let user = register_user(&client, "Nobody").await;

    let response = client
        .delete(format!("{}/participants/{}", API_BASE_URL, Uuid::now_v7()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to send cancel");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_event_without_capacity_admits_everyone() {
    let client = reqwest::Client::new();
    let creator = register_user(&client, "Creator").await;
    let event = create_event(&client, &creator.token, "Open House", None).await;

    for i in 0..8 {
        let guest = register_user(&client, &format!("Guest{i}")).await;
        let response = rsvp(&client, &guest.token, event.id).await;
        assert_eq!(response.status(), 201);
    }
}

/// The capacity invariant under concurrency: N simultaneous RSVPs against
/// a capacity-C event commit exactly C participants.
#[tokio::test]
#[ignore]
async fn test_concurrent_rsvps_respect_capacity() {
    const CAPACITY: i32 = 5;
    const CONTENDERS: usize = 12;

    let client = reqwest::Client::new();
    let creator = register_user(&client, "Creator").await;
    let event = create_event(&client, &creator.token, "Hot Ticket", Some(CAPACITY)).await;

    let mut guests = Vec::new();
    for i in 0..CONTENDERS {
        guests.push(register_user(&client, &format!("Contender{i}")).await);
    }

    let attempts = guests
        .iter()
        .map(|guest| rsvp(&client, &guest.token, event.id));
    let responses = futures::future::join_all(attempts).await;

    let successes = responses.iter().filter(|r| r.status() == 201).count();
    let rejected = responses.iter().filter(|r| r.status() == 400).count();
    assert_eq!(successes, CAPACITY as usize);
    assert_eq!(rejected, CONTENDERS - CAPACITY as usize);

    let list: ParticipantsResponse = client
        .get(format!("{}/participants/event/{}", API_BASE_URL, event.id))
        .bearer_auth(&creator.token)
        .send()
        .await
        .expect("Failed to list participants")
        .json()
        .await
        .expect("Failed to parse participants");
    assert_eq!(list.count, i64::from(CAPACITY));
}
