use furniture_recommender::{
    ContentItem, PromptBuilder,
    models::GenerationConfig,
    models::gemini::GeminiPart,
    prompt::{CHAIR_ROLES, ROOM_ROLE, Segment},
    scene::Scene,
    transform::build_request,
};

fn furniture_builder() -> PromptBuilder {
    PromptBuilder::new()
        .image("room", "gs://bucket/rooms/living_room.jpeg")
        .image("chair_1", "gs://bucket/chairs/1.jpeg")
        .image("chair_2", "gs://bucket/chairs/2.jpeg")
        .image("chair_3", "gs://bucket/chairs/3.jpeg")
        .image("chair_4", "gs://bucket/chairs/4.jpeg")
}

#[test]
fn test_items_follow_template_order() {
    let prompt = furniture_builder().build().unwrap();
    let items = prompt.items();

    assert_eq!(items.len(), 13);
    assert_eq!(items[0], ContentItem::text("Consider the following chairs:"));
    assert_eq!(items[1], ContentItem::text("chair 1:"));
    assert_eq!(items[2], ContentItem::image("gs://bucket/chairs/1.jpeg", "image/jpeg"));
    assert_eq!(items[7], ContentItem::text("and"));
    assert_eq!(items[8], ContentItem::text("chair 4:"));
    assert_eq!(items[9], ContentItem::image("gs://bucket/chairs/4.jpeg", "image/jpeg"));
    assert!(matches!(&items[10], ContentItem::Text(t) if t.starts_with('\n')));
    assert_eq!(
        items[11],
        ContentItem::image("gs://bucket/rooms/living_room.jpeg", "image/jpeg")
    );
    assert!(matches!(&items[12], ContentItem::Text(t) if t.contains("table format")));
}

#[test]
fn test_room_image_appears_once_after_chairs() {
    let prompt = furniture_builder().build().unwrap();
    let room_positions: Vec<usize> = prompt
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.as_image()
                .is_some_and(|image| image.uri.contains("living_room"))
        })
        .map(|(i, _)| i)
        .collect();
    assert_eq!(room_positions, vec![11]);

    let last_chair = prompt
        .items()
        .iter()
        .rposition(|item| item.as_image().is_some_and(|image| image.uri.contains("chairs")))
        .unwrap();
    assert!(last_chair < room_positions[0]);
    assert_eq!(prompt.images().count(), 5);
}

#[test]
fn test_same_input_same_prompt() {
    assert_eq!(
        furniture_builder().build().unwrap(),
        furniture_builder().build().unwrap()
    );
}

#[test]
fn test_missing_role_is_rejected() {
    let err = PromptBuilder::new()
        .image("room", "gs://bucket/room.jpeg")
        .image("chair_1", "gs://bucket/1.jpeg")
        .image("chair_2", "gs://bucket/2.jpeg")
        .image("chair_4", "gs://bucket/4.jpeg")
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("chair_3"));
    assert_eq!(err.kind(), "invalid_prompt");
}

#[test]
fn test_blank_uri_is_rejected() {
    let err = furniture_builder().image("room", "   ").build().unwrap_err();
    assert!(err.to_string().contains("'room'"));
}

#[test]
fn test_custom_mime_type_and_template() {
    const SINGLE: &[Segment] = &[Segment::Text("Describe:"), Segment::Image("photo")];
    let prompt = PromptBuilder::new()
        .with_template(SINGLE)
        .mime_type("image/png")
        .image("photo", "gs://bucket/photo.png")
        .image("unused", "gs://bucket/other.png")
        .build()
        .unwrap();

    assert_eq!(prompt.len(), 2);
    assert_eq!(prompt.items()[1], ContentItem::image("gs://bucket/photo.png", "image/png"));
}

#[test]
fn test_scene_prompt_binds_every_role() {
    let scene = Scene::living_room();
    let prompt = scene.prompt().unwrap();

    assert_eq!(prompt.len(), 13);
    assert_eq!(scene.room.role, ROOM_ROLE);
    assert_eq!(scene.chairs.len(), CHAIR_ROLES.len());
    assert_eq!(scene.chairs[2].caption, "Chair 3");
    assert!(
        scene
            .room
            .display_url
            .starts_with("https://storage.googleapis.com/")
    );

    let rendered = prompt.to_string();
    assert!(rendered.starts_with("Consider the following chairs:\nchair 1:\n[image gs://"));
}

#[test]
fn test_prompt_converts_to_single_user_turn() {
    let prompt = furniture_builder().build().unwrap();
    let request = build_request(&prompt, &GenerationConfig::vision_default(), &[]).unwrap();

    assert_eq!(request.contents.len(), 1);
    assert_eq!(request.contents[0].role.as_deref(), Some("user"));

    let parts = &request.contents[0].parts;
    assert_eq!(parts.len(), prompt.len());
    assert_eq!(parts[0].as_text(), Some("Consider the following chairs:"));
    match &parts[11] {
        GeminiPart::FileData { file_data } => {
            assert_eq!(file_data.file_uri, "gs://bucket/rooms/living_room.jpeg");
            assert_eq!(file_data.mime_type, "image/jpeg");
        }
        other => panic!("Expected fileData part, got {:?}", other),
    }

    let json = serde_json::to_value(&request).unwrap();
    let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.1).abs() < 1e-6);
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
    assert_eq!(
        json["contents"][0]["parts"][2]["fileData"]["fileUri"],
        "gs://bucket/chairs/1.jpeg"
    );
}
