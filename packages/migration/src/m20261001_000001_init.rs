use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Games {
    Table,
    Id,
    Name,
    Status,
    AdminToken,
    WinnerId,
    Version,
    CreatedAt,
    StartedAt,
    EndedAt,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    GameId,
    Name,
    Contact,
    AccessToken,
    TargetId,
    IsAlive,
    Kills,
    CurrentTaskId,
    CreatedAt,
    EliminatedAt,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    GameId,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum KillRequests {
    Table,
    Id,
    GameId,
    KillerId,
    VictimId,
    Status,
    CreatedAt,
    ResolvedAt,
}

#[derive(Iden)]
enum GameStatusEnum {
    #[iden = "game_status"]
    Type,
}

#[derive(Iden)]
enum KillRequestStatusEnum {
    #[iden = "kill_request_status"]
    Type,
}

/// Postgres gets a real enum type; SQLite stores the same values as TEXT.
fn status_column<C, T>(backend: DatabaseBackend, col: C, ty: T) -> ColumnDef
where
    C: IntoIden,
    T: IntoIden,
{
    let mut def = ColumnDef::new(col);
    match backend {
        DatabaseBackend::Postgres => {
            def.custom(ty);
        }
        _ => {
            def.string_len(16);
        }
    }
    def.not_null();
    def
}

async fn enum_exists(manager: &SchemaManager<'_>, enum_name: &str) -> Result<bool, DbErr> {
    let result = manager
        .get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            format!("SELECT 1 FROM pg_type WHERE typname = '{enum_name}'"),
        ))
        .await?;
    Ok(result.is_some())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        match backend {
            DatabaseBackend::Postgres => {
                if !enum_exists(manager, "game_status").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(GameStatusEnum::Type)
                                .values(["WAITING", "ACTIVE", "FINISHED"])
                                .to_owned(),
                        )
                        .await?;
                }
                if !enum_exists(manager, "kill_request_status").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(KillRequestStatusEnum::Type)
                                .values(["PENDING", "CONFIRMED", "REJECTED"])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            DatabaseBackend::Sqlite => {
                // SQLite doesn't need enum types - they're stored as TEXT
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::Name).string().not_null())
                    .col(status_column(
                        backend,
                        Games::Status,
                        GameStatusEnum::Type,
                    ))
                    .col(ColumnDef::new(Games::AdminToken).string().not_null())
                    .col(ColumnDef::new(Games::WinnerId).big_integer().null())
                    .col(
                        ColumnDef::new(Games::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_games_admin_token")
                    .table(Games::Table)
                    .col(Games::AdminToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // tasks (before players: players.current_task_id references it)
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Tasks::GameId).string_len(16).not_null())
                    .col(ColumnDef::new(Tasks::Description).text().not_null())
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_game_id")
                            .from(Tasks::Table, Tasks::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_tasks_game_id")
                    .table(Tasks::Table)
                    .col(Tasks::GameId)
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::GameId).string_len(16).not_null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(ColumnDef::new(Players::Contact).string().not_null())
                    .col(ColumnDef::new(Players::AccessToken).string().not_null())
                    .col(ColumnDef::new(Players::TargetId).big_integer().null())
                    .col(
                        ColumnDef::new(Players::IsAlive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Players::Kills)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Players::CurrentTaskId).big_integer().null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::EliminatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_game_id")
                            .from(Players::Table, Players::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_target_id")
                            .from(Players::Table, Players::TargetId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_current_task_id")
                            .from(Players::Table, Players::CurrentTaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_access_token")
                    .table(Players::Table)
                    .col(Players::AccessToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_game_name")
                    .table(Players::Table)
                    .col(Players::GameId)
                    .col(Players::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // kill_requests
        manager
            .create_table(
                Table::create()
                    .table(KillRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KillRequests::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(KillRequests::GameId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KillRequests::KillerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KillRequests::VictimId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(status_column(
                        backend,
                        KillRequests::Status,
                        KillRequestStatusEnum::Type,
                    ))
                    .col(
                        ColumnDef::new(KillRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KillRequests::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kill_requests_game_id")
                            .from(KillRequests::Table, KillRequests::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kill_requests_killer_id")
                            .from(KillRequests::Table, KillRequests::KillerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kill_requests_victim_id")
                            .from(KillRequests::Table, KillRequests::VictimId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_kill_requests_game_status")
                    .table(KillRequests::Table)
                    .col(KillRequests::GameId)
                    .col(KillRequests::Status)
                    .to_owned(),
            )
            .await?;

        // At most one pending claim per (killer, victim). Same syntax on both backends.
        manager
            .get_connection()
            .execute(Statement::from_string(
                backend,
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_kill_requests_pending_pair \
                 ON kill_requests (killer_id, victim_id) WHERE status = 'PENDING'",
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .get_connection()
            .execute(Statement::from_string(
                backend,
                "DROP INDEX IF EXISTS ux_kill_requests_pending_pair",
            ))
            .await?;

        manager
            .drop_table(Table::drop().table(KillRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;

        match backend {
            DatabaseBackend::Postgres => {
                manager
                    .drop_type(
                        PgType::drop()
                            .name(KillRequestStatusEnum::Type)
                            .if_exists()
                            .to_owned(),
                    )
                    .await?;
                manager
                    .drop_type(
                        PgType::drop()
                            .name(GameStatusEnum::Type)
                            .if_exists()
                            .to_owned(),
                    )
                    .await?;
            }
            DatabaseBackend::Sqlite => {
                // SQLite doesn't have enum types to drop
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        Ok(())
    }
}
