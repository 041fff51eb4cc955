use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConceptRoots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConceptRoots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConceptRoots::Uid).string().not_null())
                    .col(ColumnDef::new(ConceptRoots::ConceptType).string().not_null())
                    .col(ColumnDef::new(ConceptRoots::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConceptValues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConceptValues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConceptValues::ConceptRootId).integer().not_null())
                    .col(ColumnDef::new(ConceptValues::Name).string().not_null())
                    .col(ColumnDef::new(ConceptValues::Version).string().not_null())
                    .col(ColumnDef::new(ConceptValues::Status).string().not_null())
                    .col(ColumnDef::new(ConceptValues::StartDate).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_concept_values_concept_root_id")
                            .from(ConceptValues::Table, ConceptValues::ConceptRootId)
                            .to(ConceptRoots::Table, ConceptRoots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CtTermRoots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CtTermRoots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CtTermRoots::Uid).string().not_null().unique_key())
                    .col(ColumnDef::new(CtTermRoots::Name).string().not_null())
                    .col(ColumnDef::new(CtTermRoots::Codelist).string())
                    .col(ColumnDef::new(CtTermRoots::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_concept_roots_type_uid")
                    .table(ConceptRoots::Table)
                    .col(ConceptRoots::ConceptType)
                    .col(ConceptRoots::Uid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_concept_values_root_version")
                    .table(ConceptValues::Table)
                    .col(ConceptValues::ConceptRootId)
                    .col(ConceptValues::Version)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CtTermRoots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConceptValues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConceptRoots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ConceptRoots {
    Table,
    Id,
    Uid,
    ConceptType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ConceptValues {
    Table,
    Id,
    ConceptRootId,
    Name,
    Version,
    Status,
    StartDate,
}

#[derive(DeriveIden)]
enum CtTermRoots {
    Table,
    Id,
    Uid,
    Name,
    Codelist,
    CreatedAt,
}
