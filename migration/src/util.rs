use sea_orm_migration::prelude::*;

/// Every table starts with `id`, `created_at` and `updated_at`
pub(crate) fn default_table_statement() -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(ColumnDef::new(DefaultColumn::Id)
            .uuid()
            .primary_key()
            .default(Expr::cust("GEN_RANDOM_UUID()"))
            .take())
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// `from.column` references `to.id`, following updates and deletes
pub(crate) fn belongs_to(from: impl IntoIden, column: impl IntoIden, to: impl IntoIden) -> ForeignKeyCreateStatement {
    ForeignKeyCreateStatement::new()
        .from_tbl(from)
        .from_col(column)
        .to_tbl(to)
        .to_col(DefaultColumn::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .take()
}

/// Same as [`belongs_to`] but the reference is cleared when the target goes away
pub(crate) fn optionally_belongs_to(from: impl IntoIden, column: impl IntoIden, to: impl IntoIden) -> ForeignKeyCreateStatement {
    belongs_to(from, column, to)
        .on_delete(ForeignKeyAction::SetNull)
        .take()
}

pub(crate) fn unique_index<C: IntoIndexColumn>(name: &str, table: impl IntoIden, columns: impl IntoIterator<Item = C>) -> IndexCreateStatement {
    let mut index = IndexCreateStatement::new();
    index.name(name).table(table).unique().if_not_exists();

    for column in columns {
        index.col(column);
    }

    index
}
