// ABOUTME: Initial migration to create users, rolls, frames, and equipment tables
// ABOUTME: Sets up the complete film log schema with ownership foreign keys

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .big_integer()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rolls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rolls::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rolls::Name).string().not_null())
                    .col(ColumnDef::new(Rolls::FilmManufacturer).string().not_null())
                    .col(ColumnDef::new(Rolls::FilmType).string().not_null())
                    .col(ColumnDef::new(Rolls::Iso).integer().not_null())
                    .col(ColumnDef::new(Rolls::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rolls_user_id")
                            .from(Rolls::Table, Rolls::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cameras::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cameras::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cameras::Name).string().not_null())
                    .col(ColumnDef::new(Cameras::Brand).string())
                    .col(ColumnDef::new(Cameras::MinShutterSpeed).string())
                    .col(ColumnDef::new(Cameras::MaxShutterSpeed).string())
                    .col(ColumnDef::new(Cameras::SerialNumber).string())
                    .col(ColumnDef::new(Cameras::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cameras_user_id")
                            .from(Cameras::Table, Cameras::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lenses::Name).string().not_null())
                    .col(ColumnDef::new(Lenses::FocalLength).string())
                    .col(ColumnDef::new(Lenses::MinAperture).string().not_null())
                    .col(ColumnDef::new(Lenses::MaxAperture).string().not_null())
                    .col(ColumnDef::new(Lenses::SerialNumber).string())
                    .col(ColumnDef::new(Lenses::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lenses_user_id")
                            .from(Lenses::Table, Lenses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Filters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Filters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Filters::Name).string().not_null())
                    .col(ColumnDef::new(Filters::Kind).string())
                    .col(ColumnDef::new(Filters::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_filters_user_id")
                            .from(Filters::Table, Filters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Frames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Frames::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Frames::Filename).string())
                    .col(ColumnDef::new(Frames::ShutterSpeed).string())
                    .col(ColumnDef::new(Frames::Aperture).string())
                    .col(ColumnDef::new(Frames::ImageFile).string())
                    .col(ColumnDef::new(Frames::FrameNumber).integer().not_null())
                    .col(ColumnDef::new(Frames::RollId).integer().not_null())
                    .col(ColumnDef::new(Frames::CameraId).integer())
                    .col(ColumnDef::new(Frames::LensId).integer())
                    .col(ColumnDef::new(Frames::FilterId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_frames_roll_id")
                            .from(Frames::Table, Frames::RollId)
                            .to(Rolls::Table, Rolls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_frames_camera_id")
                            .from(Frames::Table, Frames::CameraId)
                            .to(Cameras::Table, Cameras::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_frames_lens_id")
                            .from(Frames::Table, Frames::LensId)
                            .to(Lenses::Table, Lenses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_frames_filter_id")
                            .from(Frames::Table, Frames::FilterId)
                            .to(Filters::Table, Filters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .index(
                        Index::create()
                            .name("idx_frames_roll_frame_number")
                            .table(Frames::Table)
                            .col(Frames::RollId)
                            .col(Frames::FrameNumber)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Frames::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Filters::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cameras::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rolls::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rolls {
    Table,
    Id,
    Name,
    FilmManufacturer,
    FilmType,
    Iso,
    UserId,
}

#[derive(DeriveIden)]
enum Frames {
    Table,
    Id,
    Filename,
    ShutterSpeed,
    Aperture,
    ImageFile,
    FrameNumber,
    RollId,
    CameraId,
    LensId,
    FilterId,
}

#[derive(DeriveIden)]
enum Cameras {
    Table,
    Id,
    Name,
    Brand,
    MinShutterSpeed,
    MaxShutterSpeed,
    SerialNumber,
    UserId,
}

#[derive(DeriveIden)]
enum Lenses {
    Table,
    Id,
    Name,
    FocalLength,
    MinAperture,
    MaxAperture,
    SerialNumber,
    UserId,
}

#[derive(DeriveIden)]
enum Filters {
    Table,
    Id,
    Name,
    #[sea_orm(iden = "type")]
    Kind,
    UserId,
}
