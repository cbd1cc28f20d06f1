use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchHistory::UserId).integer().not_null())
                    .col(ColumnDef::new(SearchHistory::Query).string().null())
                    .col(ColumnDef::new(SearchHistory::ResultsJson).text().null())
                    .col(
                        ColumnDef::new(SearchHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_history_user")
                            .from(SearchHistory::Table, SearchHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ImageHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImageHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ImageHistory::UserId).integer().not_null())
                    .col(ColumnDef::new(ImageHistory::Prompt).string().null())
                    .col(ColumnDef::new(ImageHistory::ImageUrl).text().null())
                    .col(ColumnDef::new(ImageHistory::Meta).text().null())
                    .col(
                        ColumnDef::new(ImageHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_history_user")
                            .from(ImageHistory::Table, ImageHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Every read is scoped to one user and ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_search_history_user_created")
                    .table(SearchHistory::Table)
                    .col(SearchHistory::UserId)
                    .col(SearchHistory::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_history_user_created")
                    .table(ImageHistory::Table)
                    .col(ImageHistory::UserId)
                    .col(ImageHistory::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImageHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SearchHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum SearchHistory {
    Table,
    Id,
    UserId,
    Query,
    ResultsJson,
    CreatedAt,
}

#[derive(Iden)]
enum ImageHistory {
    Table,
    Id,
    UserId,
    Prompt,
    ImageUrl,
    Meta,
    CreatedAt,
}
