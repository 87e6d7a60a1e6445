// ABOUTME: Comprehensive tests for the storage layer
// ABOUTME: Covers tenant isolation, frame numbering, uploads, and export shape

#[cfg(test)]
mod tests {
    use super::super::error::AppError;
    use super::super::storage::Storage;
    use super::super::types::{NewCamera, NewFilter, NewFrame, NewLens, NewRoll};
    use super::super::uploads::Upload;
    use tempfile::TempDir;

    async fn create_test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let storage = Storage::new(&db_url).await.unwrap();
        (storage, temp_dir)
    }

    fn kodak_roll(name: &str) -> NewRoll {
        NewRoll {
            name: name.to_string(),
            film_manufacturer: "Kodak".to_string(),
            film_type: "Portra 400".to_string(),
            iso: 400,
        }
    }

    fn plain_camera(name: &str) -> NewCamera {
        NewCamera {
            name: name.to_string(),
            brand: None,
            min_shutter_speed: Some("1".to_string()),
            max_shutter_speed: Some("1/1000".to_string()),
            serial_number: None,
        }
    }

    #[tokio::test]
    async fn test_user_operations() {
        let (storage, _temp_dir) = create_test_storage().await;

        let user = storage.create_user("testuser", "hash").await.unwrap();
        assert!(user.id > 0);

        let by_name = storage
            .find_user_by_username("testuser")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, user.id);

        let by_id = storage.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "testuser");

        assert!(storage
            .find_user_by_username("nonexistent")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_without_new_row() {
        let (storage, _temp_dir) = create_test_storage().await;

        storage.create_user("alice", "hash1").await.unwrap();
        let result = storage.create_user("alice", "hash2").await;
        assert!(matches!(result, Err(AppError::DuplicateUsername(_))));

        // First row untouched, no second row written.
        let kept = storage
            .find_user_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.password_hash, "hash1");
    }

    #[tokio::test]
    async fn test_roll_listing_is_tenant_scoped() {
        let (storage, _temp_dir) = create_test_storage().await;

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let bob = storage.create_user("bob", "hash").await.unwrap();

        let alice_roll = storage
            .create_roll(alice.id, kodak_roll("Alice trip"))
            .await
            .unwrap();
        storage
            .create_roll(bob.id, kodak_roll("Bob trip"))
            .await
            .unwrap();

        let alice_rolls = storage.list_rolls(alice.id).await.unwrap();
        assert_eq!(alice_rolls.len(), 1);
        assert_eq!(alice_rolls[0].name, "Alice trip");

        // Direct lookup of another user's roll reads as nonexistent.
        let result = storage.roll_owned(bob.id, alice_roll.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_frame_numbers_are_sequential_and_never_reused() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();

        let first = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();
        let second = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();
        assert_eq!(first.frame_number, 1);
        assert_eq!(second.frame_number, 2);

        // Deleting frame 1 leaves a gap; the number is not reissued.
        storage.delete_frame(alice.id, first.id).await.unwrap();
        let third = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();
        assert_eq!(third.frame_number, 3);

        let frames = storage.roll_frames(roll.id).await.unwrap();
        let numbers: Vec<i32> = frames.iter().map(|f| f.frame_number).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_add_frame_to_foreign_roll_is_not_found() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let bob = storage.create_user("bob", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();

        let result = storage
            .add_frame(bob.id, roll.id, NewFrame::default(), None, &uploads)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(storage.roll_frames(roll.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_frame_cannot_reference_foreign_equipment() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let bob = storage.create_user("bob", "hash").await.unwrap();

        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();
        let bobs_camera = storage
            .add_camera(bob.id, plain_camera("Bob's F3"))
            .await
            .unwrap();

        let data = NewFrame {
            camera_id: Some(bobs_camera.id),
            ..Default::default()
        };
        let result = storage.add_frame(alice.id, roll.id, data, None, &uploads).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_frame_keeps_number_and_roll() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();
        let camera = storage
            .add_camera(alice.id, plain_camera("F3"))
            .await
            .unwrap();

        let frame = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();

        let update = super::super::types::FrameUpdate {
            shutter_speed: Some("1/250".to_string()),
            aperture: Some("f/8".to_string()),
            camera_id: Some(camera.id),
            lens_id: None,
            filter_id: None,
        };
        let updated = storage.update_frame(alice.id, frame.id, update).await.unwrap();

        assert_eq!(updated.shutter_speed.as_deref(), Some("1/250"));
        assert_eq!(updated.camera_id, Some(camera.id));
        assert_eq!(updated.frame_number, frame.frame_number);
        assert_eq!(updated.roll_id, roll.id);
    }

    #[tokio::test]
    async fn test_delete_foreign_frame_is_not_found() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let bob = storage.create_user("bob", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();
        let frame = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();

        let result = storage.delete_frame(bob.id, frame.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(storage.roll_frames(roll.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_frame_stores_upload_with_scoped_name() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();

        let upload = Upload {
            original_name: "my scan.jpg".to_string(),
            bytes: vec![0xFF, 0xD8],
        };
        let frame = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), Some(upload), &uploads)
            .await
            .unwrap();

        let stored = frame.image_file.unwrap();
        assert_eq!(stored, format!("{}_1_my_scan.jpg", roll.id));
        assert!(uploads.join(&stored).exists());
    }

    #[tokio::test]
    async fn test_equipment_lists_are_tenant_scoped() {
        let (storage, _temp_dir) = create_test_storage().await;

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let bob = storage.create_user("bob", "hash").await.unwrap();

        storage
            .add_camera(alice.id, plain_camera("F3"))
            .await
            .unwrap();
        storage
            .add_lens(
                alice.id,
                NewLens {
                    name: "50mm".to_string(),
                    focal_length: Some("50mm".to_string()),
                    min_aperture: "f/1.8".to_string(),
                    max_aperture: "f/22".to_string(),
                    serial_number: None,
                },
            )
            .await
            .unwrap();
        storage
            .add_filter(
                alice.id,
                NewFilter {
                    name: "Red 25".to_string(),
                    kind: Some("color".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(storage.list_cameras(alice.id).await.unwrap().len(), 1);
        assert_eq!(storage.list_lenses(alice.id).await.unwrap().len(), 1);
        assert_eq!(storage.list_filters(alice.id).await.unwrap().len(), 1);

        assert!(storage.list_cameras(bob.id).await.unwrap().is_empty());
        assert!(storage.list_lenses(bob.id).await.unwrap().is_empty());
        assert!(storage.list_filters(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_denormalizes_equipment_and_keeps_nulls() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();
        let camera = storage
            .add_camera(alice.id, plain_camera("F3"))
            .await
            .unwrap();

        let with_camera = NewFrame {
            shutter_speed: Some("1/125".to_string()),
            aperture: Some("f/8".to_string()),
            camera_id: Some(camera.id),
            ..Default::default()
        };
        storage
            .add_frame(alice.id, roll.id, with_camera, None, &uploads)
            .await
            .unwrap();
        storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();

        let doc = storage.export_roll(alice.id, roll.id).await.unwrap();
        assert_eq!(doc.role_name, "Trip");
        assert_eq!(doc.film_manufacturer, "Kodak");
        assert_eq!(doc.film_type, "Portra 400");
        assert_eq!(doc.iso, 400);
        assert_eq!(doc.images.len(), 2);

        assert_eq!(doc.images[0].camera.as_deref(), Some("F3"));
        assert_eq!(doc.images[0].lens, None);
        assert_eq!(doc.images[0].filter, None);
        assert_eq!(doc.images[1].camera, None);

        // Export of a foreign roll is indistinguishable from a missing one.
        let bob = storage.create_user("bob", "hash").await.unwrap();
        let result = storage.export_roll(bob.id, roll.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_export_skips_deleted_frames() {
        let (storage, temp_dir) = create_test_storage().await;
        let uploads = temp_dir.path().join("uploads");

        let alice = storage.create_user("alice", "hash").await.unwrap();
        let roll = storage
            .create_roll(alice.id, kodak_roll("Trip"))
            .await
            .unwrap();

        let first = storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();
        storage
            .add_frame(alice.id, roll.id, NewFrame::default(), None, &uploads)
            .await
            .unwrap();
        storage.delete_frame(alice.id, first.id).await.unwrap();

        let doc = storage.export_roll(alice.id, roll.id).await.unwrap();
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].frame_number, 2);
    }
}
