//! PostgreSQL statement rendering.

mod common;
use common::*;

use sqlkiln_core::dialect::{symbols, AttributeValue};
use sqlkiln_core::query::{Join, JoinKind, Operator, Predicate, Query, QueryKind};
use sqlkiln_core::schema::{
    ColumnSpec, DefaultValue, ForeignKeyAction, IndexColumn, KeySpec, Length, SchemaDescription,
    SortOrder,
};
use sqlkiln_core::{BindingKind, Capability, Error, SqlValue};
use sqlkiln_pgsql::dialect::{
    CONCURRENTLY, DELETE_ROWS, ON_COMMIT, RESTART_IDENTITY, TABLESPACE, WITH, WITH_OIDS,
};
use sqlkiln_pgsql::PgsqlQueryExt;

// ===================================================================
// Statement templates
// ===================================================================

#[test]
fn add_statements_overrides_by_name() {
    let mut d = pgsql();
    assert!(!d.has_statement("foo"));
    assert_eq!(
        d.statement("truncate").map(|s| s.template().to_string()).ok(),
        Some(String::from("TRUNCATE {a.only} {table} {a.identity} {a.action}"))
    );

    d.add_statements([("foo", "Foo"), ("truncate", "TRUNCATE ALL THE THINGS")]);

    assert!(d.has_statement("foo"));
    assert_eq!(
        d.render_template("truncate", &[]).unwrap(),
        "TRUNCATE ALL THE THINGS;"
    );
}

#[test]
fn render_template_fills_literal_fragments() {
    let sql = pgsql()
        .render_template("select", &[("table", "tableName"), ("fields", "*")])
        .unwrap();
    assert_eq!(sql, "SELECT * FROM tableName;");
}

// ===================================================================
// CREATE / DROP INDEX
// ===================================================================

#[test]
fn create_index() {
    let base = Query::new(QueryKind::CreateIndex).from("users").alias("idx");

    assert_eq!(
        sql(&base.clone().index_column("profile_id")),
        r#"CREATE INDEX "idx" ON "users" ("profile_id");"#
    );
    assert_eq!(
        sql(&base.clone().index_column(IndexColumn::new("profile_id").length(5))),
        r#"CREATE INDEX "idx" ON "users" ("profile_id"(5));"#
    );
    assert_eq!(
        sql(&base
            .clone()
            .index_column(IndexColumn::new("profile_id").order(SortOrder::Asc))
            .index_column("other_id")),
        r#"CREATE INDEX "idx" ON "users" ("profile_id" ASC, "other_id");"#
    );
    assert_eq!(
        sql(&base
            .clone()
            .index_column(IndexColumn::new("profile_id").length(5).order(SortOrder::Desc))),
        r#"CREATE INDEX "idx" ON "users" ("profile_id"(5) DESC);"#
    );
    assert_eq!(
        sql(&base
            .index_column("profile_id")
            .attribute("type", symbols::UNIQUE)
            .attribute(CONCURRENTLY, true)),
        r#"CREATE UNIQUE INDEX CONCURRENTLY "idx" ON "users" ("profile_id");"#
    );
}

#[test]
fn create_index_requires_columns_and_name() {
    assert!(matches!(
        render_err(&Query::new(QueryKind::CreateIndex).from("users").alias("idx")),
        Error::MissingFields(QueryKind::CreateIndex)
    ));
    assert!(matches!(
        render_err(&Query::new(QueryKind::CreateIndex).from("users").index_column("a")),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn drop_index() {
    let base = Query::new(QueryKind::DropIndex).from("users").alias("idx");
    assert_eq!(sql(&base), r#"DROP INDEX IF EXISTS "idx";"#);
    assert_eq!(
        sql(&base.clone().attribute(CONCURRENTLY, true)),
        r#"DROP INDEX CONCURRENTLY IF EXISTS "idx";"#
    );
    assert_eq!(
        sql(&base.attribute("action", symbols::CASCADE)),
        r#"DROP INDEX IF EXISTS "idx" CASCADE;"#
    );
}

// ===================================================================
// CREATE / DROP TABLE
// ===================================================================

#[test]
fn create_table() {
    let mut schema =
        SchemaDescription::new("foobar").with_column(ColumnSpec::new("column", "int").auto_increment());
    let d = pgsql();

    assert_eq!(
        d.render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        "CREATE TABLE IF NOT EXISTS \"foobar\" (\n\"column\" serial NOT NULL\n);"
    );

    schema.add_column(ColumnSpec::new("column", "int").auto_increment().primary());
    assert_eq!(
        d.render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        "CREATE TABLE IF NOT EXISTS \"foobar\" (\n\"column\" serial NOT NULL,\nPRIMARY KEY (\"column\")\n);"
    );

    schema.add_column(ColumnSpec::new("column2", "int").nullable(true).indexed());
    let without_options = concat!(
        "CREATE TABLE IF NOT EXISTS \"foobar\" (\n",
        "\"column\" serial NOT NULL,\n",
        "\"column2\" integer NULL,\n",
        "PRIMARY KEY (\"column\")\n",
        ")"
    );
    assert_eq!(
        d.render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        format!("{without_options};")
    );

    schema.add_option(ON_COMMIT, DELETE_ROWS);
    assert_eq!(
        d.render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        format!("{without_options} ON COMMIT DELETE ROWS;")
    );

    schema.add_option(TABLESPACE, "foobar");
    schema.add_option(WITH, WITH_OIDS);
    assert_eq!(
        d.render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        format!("{without_options} ON COMMIT DELETE ROWS TABLESPACE foobar WITH OIDS;")
    );
}

#[test]
fn create_table_attributes() {
    let query = Query::new(QueryKind::CreateTable)
        .schema(SchemaDescription::new("scratch").with_column(ColumnSpec::new("n", "int")));
    assert_eq!(
        sql(&query.clone().attribute("unlogged", true)),
        "CREATE UNLOGGED TABLE IF NOT EXISTS \"scratch\" (\n\"n\" integer NULL\n);"
    );
    assert_eq!(
        sql(&query.attribute("temporary", true)),
        "CREATE TEMPORARY TABLE IF NOT EXISTS \"scratch\" (\n\"n\" integer NULL\n);"
    );
}

#[test]
fn sequence_backed_columns_render_as_serial() {
    let nextval = DefaultValue::Expression(String::from("nextval('t_id_seq'::regclass)"));
    let schema = SchemaDescription::new("t")
        .with_column(
            ColumnSpec::new("id", "bigint")
                .primary()
                .auto_increment()
                .default_value(nextval.clone()),
        )
        .with_column(
            ColumnSpec::new("rank", "smallint")
                .auto_increment()
                .default_value(nextval),
        );
    assert_eq!(
        pgsql().render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        concat!(
            "CREATE TABLE IF NOT EXISTS \"t\" (\n",
            "\"id\" bigserial NOT NULL,\n",
            "\"rank\" smallserial NOT NULL,\n",
            "PRIMARY KEY (\"id\")\n",
            ");"
        )
    );
}

#[test]
fn auto_increment_integers_render_as_serial() {
    let schema = SchemaDescription::new("users")
        .with_column(ColumnSpec::new("id", "int").primary().auto_increment())
        .with_column(ColumnSpec::new("seq", "bigint").auto_increment())
        .with_column(
            ColumnSpec::new("revision", "int")
                .auto_increment()
                .default_value(DefaultValue::Integer(1)),
        );
    assert_eq!(
        pgsql().render_ddl(&schema, QueryKind::CreateTable).unwrap(),
        concat!(
            "CREATE TABLE IF NOT EXISTS \"users\" (\n",
            "\"id\" serial NOT NULL,\n",
            "\"seq\" bigserial NOT NULL,\n",
            "\"revision\" integer NOT NULL DEFAULT 1,\n",
            "PRIMARY KEY (\"id\")\n",
            ");"
        )
    );
}

#[test]
fn drop_table() {
    let query = Query::new(QueryKind::DropTable).from("foobar");
    assert_eq!(sql(&query), r#"DROP TABLE IF EXISTS "foobar";"#);
    assert_eq!(
        sql(&query.attribute("action", symbols::RESTRICT)),
        r#"DROP TABLE IF EXISTS "foobar" RESTRICT;"#
    );
}

// ===================================================================
// DELETE / UPDATE / TRUNCATE
// ===================================================================

#[test]
fn delete_drops_limit_and_order() {
    let base = Query::new(QueryKind::Delete).from("foobar");
    assert_eq!(sql(&base), r#"DELETE FROM "foobar";"#);
    assert_eq!(sql(&base.clone().limit(5)), r#"DELETE FROM "foobar";"#);

    let filtered = base.where_clause(Predicate::and().in_list("id", [1, 2, 3]));
    let (text, binds) = render(&filtered.clone().limit(5).order_by("id", SortOrder::Asc));
    assert_eq!(text, r#"DELETE FROM "foobar" WHERE "id" IN (?, ?, ?);"#);
    assert_eq!(binds, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);

    assert_eq!(
        sql(&filtered.attribute("only", true)),
        r#"DELETE FROM ONLY "foobar" WHERE "id" IN (?, ?, ?);"#
    );
}

#[test]
fn delete_and_update_joins_are_rejected() {
    let join = Join::new(JoinKind::Inner, "profiles").on("users.id", "profiles.user_id");
    let delete = Query::new(QueryKind::Delete).from("users").join(join.clone());
    let update = Query::new(QueryKind::Update)
        .from("users")
        .set("name", "x")
        .join(join);

    for query in [delete, update] {
        match render_err(&query) {
            Error::UnsupportedCapability {
                dialect,
                capability,
                kind,
            } => {
                assert_eq!(dialect, "pgsql");
                assert_eq!(kind, query.kind);
                assert!(matches!(
                    capability,
                    Capability::DeleteJoins | Capability::UpdateJoins
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn update() {
    let base = Query::new(QueryKind::Update).from("foobar").set("username", "miles");
    assert_eq!(sql(&base), r#"UPDATE "foobar" SET "username" = ?;"#);
    assert_eq!(
        sql(&base.limit(15).order_by("username", SortOrder::Desc)),
        r#"UPDATE "foobar" SET "username" = ?;"#
    );

    let query = Query::new(QueryKind::Update)
        .from("foobar")
        .set("email", "email@domain.com")
        .set("website", "https://example.com")
        .where_clause(Predicate::and().eq("status", 3));
    let (text, binds) = render(&query);
    assert_eq!(text, r#"UPDATE "foobar" SET "email" = ?, "website" = ? WHERE "status" = ?;"#);
    assert_eq!(binds.len(), 3);

    assert_eq!(
        sql(&query.attribute("only", true)),
        r#"UPDATE ONLY "foobar" SET "email" = ?, "website" = ? WHERE "status" = ?;"#
    );
}

#[test]
fn truncate() {
    let query = Query::new(QueryKind::Truncate).from("foobar");
    assert_eq!(sql(&query), r#"TRUNCATE "foobar";"#);

    let query = query.attribute("identity", RESTART_IDENTITY);
    assert_eq!(sql(&query), r#"TRUNCATE "foobar" RESTART IDENTITY;"#);

    let query = query.attribute("only", true);
    assert_eq!(sql(&query), r#"TRUNCATE ONLY "foobar" RESTART IDENTITY;"#);

    let query = query.attribute("action", AttributeValue::from(symbols::CASCADE));
    assert_eq!(sql(&query), r#"TRUNCATE ONLY "foobar" RESTART IDENTITY CASCADE;"#);
}

// ===================================================================
// SELECT
// ===================================================================

#[test]
fn select_locking() {
    let query = Query::new(QueryKind::Select)
        .from("users")
        .where_clause(Predicate::and().like("name", "%miles%"));
    assert_eq!(
        sql(&query.clone().lock_for_share()),
        r#"SELECT * FROM "users" WHERE "name" LIKE ? FOR SHARE;"#
    );
    assert_eq!(
        sql(&query.lock_for_update()),
        r#"SELECT * FROM "users" WHERE "name" LIKE ? FOR UPDATE;"#
    );
}

#[test]
fn select_regexp_uses_tilde_operators() {
    let query = Query::new(QueryKind::Select).from("users").where_clause(
        Predicate::and()
            .compare("name", Operator::Regexp, "^mil")
            .compare("email", Operator::NotRegexp, "@example\\.com$"),
    );
    assert_eq!(
        sql(&query),
        r#"SELECT * FROM "users" WHERE "name" ~* ? AND "email" !~* ?;"#
    );
}

#[test]
fn serial_columns_bind_as_integers() {
    let schema = SchemaDescription::new("users")
        .with_column(ColumnSpec::new("id", "serial"))
        .with_column(ColumnSpec::new("name", "varchar"));
    let query = Query::new(QueryKind::Select)
        .from("users")
        .where_clause(Predicate::and().eq("id", "5").eq("name", "miles"))
        .schema(schema);

    let (text, binds) = pgsql().render(&query).unwrap();
    assert_eq!(text, r#"SELECT * FROM "users" WHERE "id" = ? AND "name" = ?;"#);
    assert_eq!(binds[0].value, SqlValue::Int(5));
    assert_eq!(binds[0].kind, BindingKind::Int);
    assert_eq!(binds[1].kind, BindingKind::String);
}

#[test]
fn select_aliased_fields_carry_origin() {
    let query = Query::new(QueryKind::Select)
        .from("users")
        .alias("User")
        .fields(["id", "country_id", "username"])
        .join(
            Join::new(JoinKind::Left, "countries")
                .alias("Country")
                .fields(["iso"])
                .on("User.country_id", "Country.id"),
        );
    assert_eq!(
        sql(&query),
        concat!(
            r#"SELECT "User"."id" AS "User__id", "User"."country_id" AS "User__country_id", "#,
            r#""User"."username" AS "User__username", "Country"."iso" AS "Country__iso" "#,
            r#"FROM "users" AS "User" "#,
            r#"LEFT JOIN "countries" AS "Country" ON "User"."country_id" = "Country"."id";"#
        )
    );
}

#[test]
fn origin_aliases_keep_their_case() {
    let query = Query::new(QueryKind::Select)
        .from("posts")
        .alias("Post")
        .fields(["authorId", "Post.publishedAt"]);
    assert_eq!(
        sql(&query),
        concat!(
            r#"SELECT "Post"."authorId" AS "Post__authorId", "#,
            r#""Post"."publishedAt" AS "Post__publishedAt" FROM "posts" AS "Post";"#
        )
    );
}

#[test]
fn select_straight_join_is_an_inner_join() {
    let query = Query::new(QueryKind::Select)
        .from("users")
        .join(Join::new(JoinKind::Straight, "posts").on("users.id", "posts.user_id"));
    assert_eq!(
        sql(&query),
        r#"SELECT * FROM "users" INNER JOIN "posts" ON "users"."id" = "posts"."user_id";"#
    );
}

// ===================================================================
// Column and key formatting
// ===================================================================

#[test]
fn format_columns() {
    let d = pgsql();
    let column = |spec: ColumnSpec| d.format_column(&spec).unwrap();

    assert_eq!(column(ColumnSpec::new("column", "int")), r#""column" integer NULL"#);
    assert_eq!(
        column(ColumnSpec::new("column", "int").nullable(false).comment("Some comment here")),
        r#""column" integer NOT NULL"#
    );
    assert_eq!(
        column(ColumnSpec::new("column", "int").auto_increment().length(Length::Size(11))),
        r#""column" serial NOT NULL"#
    );
    assert_eq!(
        column(
            ColumnSpec::new("column", "int")
                .auto_increment()
                .length(Length::Size(11))
                .nullable(false)
                .default_value(DefaultValue::Null)
        ),
        r#""column" integer(11) NOT NULL DEFAULT NULL"#
    );
    assert_eq!(
        column(ColumnSpec::new("column2", "varchar").length(Length::Size(255)).nullable(true)),
        r#""column2" varchar(255) NULL"#
    );
    assert_eq!(
        column(
            ColumnSpec::new("column3", "smallint")
                .default_value(DefaultValue::Integer(3))
                .nullable(false)
        ),
        r#""column3" smallint NOT NULL DEFAULT 3"#
    );
    assert_eq!(
        column(ColumnSpec::new("column4", "timestamp")),
        r#""column4" timestamp NULL DEFAULT NULL"#
    );
    assert_eq!(
        column(ColumnSpec::new("column5", "varchar").collation("en_US").charset("utf8")),
        r#""column5" varchar(255) COLLATE en_US NULL"#
    );
    assert_eq!(
        column(ColumnSpec::new("column6", "varchar").constraint("foobar")),
        r#""column6" varchar(255) CONSTRAINT "foobar" NULL"#
    );
    assert_eq!(
        column(ColumnSpec::new("column7", "varchar").collation("utf8_general_ci")),
        r#""column7" varchar(255) NULL"#
    );
}

#[test]
fn remapped_types() {
    let d = pgsql();
    let column = |data_type: &str| d.format_column(&ColumnSpec::new("c", data_type)).unwrap();
    assert_eq!(column("tinyint"), r#""c" smallint NULL"#);
    assert_eq!(column("datetime"), r#""c" timestamp NULL DEFAULT NULL"#);
    assert_eq!(column("double"), r#""c" double precision NULL"#);
    assert_eq!(column("blob"), r#""c" bytea NULL"#);
    assert_eq!(column("serial"), r#""c" serial NOT NULL"#);
    assert_eq!(
        d.format_column(&ColumnSpec::new("c", "bigserial").nullable(true)).unwrap(),
        r#""c" bigserial NOT NULL"#
    );
}

#[test]
fn format_table_keys() {
    let d = pgsql();
    let mut schema = SchemaDescription::new("foobar");
    schema.add_unique("primary", None);
    let mut expected = String::from(",\nUNIQUE (\"primary\")");
    assert_eq!(d.format_table_keys(&schema).unwrap(), expected);

    schema.add_unique("unique", Some("uniqueSymbol"));
    expected.push_str(",\nCONSTRAINT \"uniqueSymbol\" UNIQUE (\"unique\")");
    assert_eq!(d.format_table_keys(&schema).unwrap(), expected);

    schema.add_key(KeySpec::foreign("fk1", "users.id"));
    expected.push_str(",\nFOREIGN KEY (\"fk1\") REFERENCES \"users\"(\"id\")");
    assert_eq!(d.format_table_keys(&schema).unwrap(), expected);

    schema.add_key(KeySpec::Foreign {
        column: String::from("fk2"),
        references: String::from("posts.id"),
        constraint: None,
        on_update: Some(ForeignKeyAction::SetNull),
        on_delete: Some(ForeignKeyAction::NoAction),
    });
    expected.push_str(
        ",\nFOREIGN KEY (\"fk2\") REFERENCES \"posts\"(\"id\") ON UPDATE SET NULL ON DELETE NO ACTION",
    );
    assert_eq!(d.format_table_keys(&schema).unwrap(), expected);

    // no inline indexes
    schema.add_index("column1");
    schema.add_index("column2");
    assert_eq!(d.format_table_keys(&schema).unwrap(), expected);
}

#[test]
fn multi_column_unique_key() {
    let mut schema = SchemaDescription::new("t");
    schema.add_key(KeySpec::Unique {
        name: String::from("idx"),
        constraint: Some(String::from("symbol")),
        columns: vec![IndexColumn::new("foo"), IndexColumn::new("bar")],
    });
    assert_eq!(
        pgsql().format_table_keys(&schema).unwrap(),
        ",\nCONSTRAINT \"symbol\" UNIQUE (\"foo\", \"bar\")"
    );
}

#[test]
fn unique_keys_drop_prefix_lengths_and_sort_orders() {
    let mut schema = SchemaDescription::new("t");
    schema.add_key(KeySpec::Unique {
        name: String::from("slug"),
        constraint: None,
        columns: vec![
            IndexColumn::new("slug").length(32).order(SortOrder::Asc),
            IndexColumn::new("site_id").order(SortOrder::Desc),
        ],
    });
    assert_eq!(
        pgsql().format_table_keys(&schema).unwrap(),
        ",\nUNIQUE (\"slug\", \"site_id\")"
    );
}

#[test]
fn quote_and_quote_list() {
    let d = pgsql();
    assert_eq!(d.quote("foo.*"), r#""foo".*"#);
    assert_eq!(d.quote(r#"foo"."bar"#), r#""foo"."bar""#);
    assert_eq!(
        d.quote_list(&["foo", "\"bar", "\"baz\""]),
        r#""foo", "bar", "baz""#
    );
    assert_eq!(d.quote_list(&["foo.bar", "\"baz\""]), r#""foo"."bar", "baz""#);
}
