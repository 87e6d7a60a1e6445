// ABOUTME: SeaORM storage layer for users, rolls, frames, and equipment
// ABOUTME: Routes every tenant-scoped lookup through one ownership predicate

use std::path::Path;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, PrimaryKeyTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use crate::entities::{camera, filter, frame, lens, roll, user};
use crate::error::{AppError, Result};
use crate::migration::Migrator;
use crate::types::{
    ExportDocument, ExportImage, FrameUpdate, NewCamera, NewFilter, NewFrame, NewLens, NewRoll,
};
use crate::uploads::{self, Upload};

/// Entities that belong to exactly one user. Every read or write of such a
/// row goes through [`Storage::find_owned`], so an ownership check cannot
/// be forgotten on one query and become a cross-tenant leak.
pub trait Owned: EntityTrait {
    fn owner_column() -> Self::Column;
}

impl Owned for roll::Entity {
    fn owner_column() -> Self::Column {
        roll::Column::UserId
    }
}

impl Owned for camera::Entity {
    fn owner_column() -> Self::Column {
        camera::Column::UserId
    }
}

impl Owned for lens::Entity {
    fn owner_column() -> Self::Column {
        lens::Column::UserId
    }
}

impl Owned for filter::Entity {
    fn owner_column() -> Self::Column {
        filter::Column::UserId
    }
}

pub struct Storage {
    pub db: DatabaseConnection,
}

impl Storage {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let db = Database::connect(database_url).await?;
        Migrator::up(&db, None).await?;
        Ok(Self { db })
    }

    /// The ownership predicate: fetch a row by id, filtered to the acting
    /// user. A row owned by someone else is indistinguishable from a row
    /// that does not exist.
    pub async fn find_owned<E>(&self, id: i32, user_id: i32) -> Result<E::Model>
    where
        E: Owned,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        E::find_by_id(<E::PrimaryKey as PrimaryKeyTrait>::ValueType::from(id))
            .filter(E::owner_column().eq(user_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} {} for user {}",
                    E::default().table_name(),
                    id,
                    user_id
                ))
            })
    }

    // ----- users -----

    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<user::Model> {
        if self.find_user_by_username(username).await?.is_some() {
            return Err(AppError::DuplicateUsername(username.to_string()));
        }

        let new_user = user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        Ok(new_user.insert(&self.db).await?)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn find_user(&self, user_id: i32) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    // ----- rolls -----

    pub async fn create_roll(&self, user_id: i32, data: NewRoll) -> Result<roll::Model> {
        let new_roll = roll::ActiveModel {
            name: Set(data.name),
            film_manufacturer: Set(data.film_manufacturer),
            film_type: Set(data.film_type),
            iso: Set(data.iso),
            user_id: Set(user_id),
            ..Default::default()
        };
        Ok(new_roll.insert(&self.db).await?)
    }

    pub async fn list_rolls(&self, user_id: i32) -> Result<Vec<roll::Model>> {
        Ok(roll::Entity::find()
            .filter(roll::Column::UserId.eq(user_id))
            .order_by_asc(roll::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn roll_owned(&self, user_id: i32, roll_id: i32) -> Result<roll::Model> {
        self.find_owned::<roll::Entity>(roll_id, user_id).await
    }

    pub async fn roll_frames(&self, roll_id: i32) -> Result<Vec<frame::Model>> {
        Ok(frame::Entity::find()
            .filter(frame::Column::RollId.eq(roll_id))
            .order_by_asc(frame::Column::FrameNumber)
            .all(&self.db)
            .await?)
    }

    // ----- frames -----

    /// Frames are owned through their roll.
    pub async fn frame_owned(&self, user_id: i32, frame_id: i32) -> Result<frame::Model> {
        let found = frame::Entity::find_by_id(frame_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("frame {}", frame_id)))?;
        self.roll_owned(user_id, found.roll_id).await?;
        Ok(found)
    }

    /// Equipment ids submitted on a frame must pass the ownership
    /// predicate too; a foreign id reads as not found.
    async fn check_equipment_refs(
        &self,
        user_id: i32,
        camera_id: Option<i32>,
        lens_id: Option<i32>,
        filter_id: Option<i32>,
    ) -> Result<()> {
        if let Some(id) = camera_id {
            self.find_owned::<camera::Entity>(id, user_id).await?;
        }
        if let Some(id) = lens_id {
            self.find_owned::<lens::Entity>(id, user_id).await?;
        }
        if let Some(id) = filter_id {
            self.find_owned::<filter::Entity>(id, user_id).await?;
        }
        Ok(())
    }

    /// Assigns the next frame_number (max existing + 1, starting at 1) and
    /// inserts in one transaction so duplicate submissions cannot mint the
    /// same number. Deleted numbers below the max are never reused.
    pub async fn add_frame(
        &self,
        user_id: i32,
        roll_id: i32,
        data: NewFrame,
        upload: Option<Upload>,
        upload_dir: &Path,
    ) -> Result<frame::Model> {
        let owned_roll = self.roll_owned(user_id, roll_id).await?;
        self.check_equipment_refs(user_id, data.camera_id, data.lens_id, data.filter_id)
            .await?;

        let txn = self.db.begin().await?;

        let last = frame::Entity::find()
            .filter(frame::Column::RollId.eq(owned_roll.id))
            .order_by_desc(frame::Column::FrameNumber)
            .one(&txn)
            .await?;
        let next_frame = last.map(|f| f.frame_number + 1).unwrap_or(1);

        let image_file = match &upload {
            Some(file) => {
                Some(uploads::store_upload(upload_dir, owned_roll.id, next_frame, file).await?)
            }
            None => None,
        };

        let new_frame = frame::ActiveModel {
            filename: Set(data.filename),
            shutter_speed: Set(data.shutter_speed),
            aperture: Set(data.aperture),
            image_file: Set(image_file),
            frame_number: Set(next_frame),
            roll_id: Set(owned_roll.id),
            camera_id: Set(data.camera_id),
            lens_id: Set(data.lens_id),
            filter_id: Set(data.filter_id),
            ..Default::default()
        };
        let inserted = new_frame.insert(&txn).await?;
        txn.commit().await?;

        Ok(inserted)
    }

    pub async fn update_frame(
        &self,
        user_id: i32,
        frame_id: i32,
        update: FrameUpdate,
    ) -> Result<frame::Model> {
        let found = self.frame_owned(user_id, frame_id).await?;
        self.check_equipment_refs(user_id, update.camera_id, update.lens_id, update.filter_id)
            .await?;

        let mut active: frame::ActiveModel = found.into();
        active.shutter_speed = Set(update.shutter_speed);
        active.aperture = Set(update.aperture);
        active.camera_id = Set(update.camera_id);
        active.lens_id = Set(update.lens_id);
        active.filter_id = Set(update.filter_id);
        Ok(active.update(&self.db).await?)
    }

    /// Removes the frame only. The roll and the numbering of the remaining
    /// frames are undisturbed. Returns the roll id for the redirect.
    pub async fn delete_frame(&self, user_id: i32, frame_id: i32) -> Result<i32> {
        let found = self.frame_owned(user_id, frame_id).await?;
        let roll_id = found.roll_id;
        frame::Entity::delete_by_id(found.id).exec(&self.db).await?;
        Ok(roll_id)
    }

    // ----- equipment -----

    pub async fn add_camera(&self, user_id: i32, data: NewCamera) -> Result<camera::Model> {
        let new_camera = camera::ActiveModel {
            name: Set(data.name),
            brand: Set(data.brand),
            min_shutter_speed: Set(data.min_shutter_speed),
            max_shutter_speed: Set(data.max_shutter_speed),
            serial_number: Set(data.serial_number),
            user_id: Set(user_id),
            ..Default::default()
        };
        Ok(new_camera.insert(&self.db).await?)
    }

    pub async fn add_lens(&self, user_id: i32, data: NewLens) -> Result<lens::Model> {
        let new_lens = lens::ActiveModel {
            name: Set(data.name),
            focal_length: Set(data.focal_length),
            min_aperture: Set(data.min_aperture),
            max_aperture: Set(data.max_aperture),
            serial_number: Set(data.serial_number),
            user_id: Set(user_id),
            ..Default::default()
        };
        Ok(new_lens.insert(&self.db).await?)
    }

    pub async fn add_filter(&self, user_id: i32, data: NewFilter) -> Result<filter::Model> {
        let new_filter = filter::ActiveModel {
            name: Set(data.name),
            kind: Set(data.kind),
            user_id: Set(user_id),
            ..Default::default()
        };
        Ok(new_filter.insert(&self.db).await?)
    }

    pub async fn list_cameras(&self, user_id: i32) -> Result<Vec<camera::Model>> {
        Ok(camera::Entity::find()
            .filter(camera::Column::UserId.eq(user_id))
            .order_by_asc(camera::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_lenses(&self, user_id: i32) -> Result<Vec<lens::Model>> {
        Ok(lens::Entity::find()
            .filter(lens::Column::UserId.eq(user_id))
            .order_by_asc(lens::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_filters(&self, user_id: i32) -> Result<Vec<filter::Model>> {
        Ok(filter::Entity::find()
            .filter(filter::Column::UserId.eq(user_id))
            .order_by_asc(filter::Column::Id)
            .all(&self.db)
            .await?)
    }

    // ----- export -----

    /// Serialize a roll and its frames with equipment references
    /// denormalized to display names, null where unset.
    pub async fn export_roll(&self, user_id: i32, roll_id: i32) -> Result<ExportDocument> {
        let owned_roll = self.roll_owned(user_id, roll_id).await?;
        let frames = self.roll_frames(owned_roll.id).await?;

        let mut images = Vec::with_capacity(frames.len());
        for f in frames {
            let camera = match f.camera_id {
                Some(id) => camera::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .map(|c| c.name),
                None => None,
            };
            let lens = match f.lens_id {
                Some(id) => lens::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .map(|l| l.name),
                None => None,
            };
            let filter = match f.filter_id {
                Some(id) => filter::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .map(|fl| fl.name),
                None => None,
            };

            images.push(ExportImage {
                frame_number: f.frame_number,
                filename: f.filename,
                shutter_speed: f.shutter_speed,
                aperture: f.aperture,
                camera,
                lens,
                filter,
                image_file: f.image_file,
            });
        }

        Ok(ExportDocument {
            role_name: owned_roll.name,
            film_manufacturer: owned_roll.film_manufacturer,
            film_type: owned_roll.film_type,
            iso: owned_roll.iso,
            images,
        })
    }
}
