#[cfg(test)]
mod tests {
    use rustf_adapter::query::{
        CompareOp, Condition, Expr, JoinClause, MySQLDialect, OrderByClause, Predicate,
        Query, SelectItem, StatementKind,
    };
    use rustf_adapter::{escape_identifier, render_select};

    #[test]
    fn test_users_end_to_end() {
        let query = Query::new("users")
            .with_columns(["id", "name"])
            .with_conditions(vec![Condition::raw("age > 18")])
            .with_order(vec![OrderByClause::asc("name")])
            .with_limit(10)
            .with_offset(0);

        assert_eq!(
            render_select(&MySQLDialect::new(), &query),
            "SELECT id, name FROM `users` WHERE age > 18 ORDER BY name ASC LIMIT 10"
        );
    }

    #[test]
    fn test_qualified_columns_with_joins() {
        let query = Query::new("settlement_banks")
            .with_columns([
                SelectItem::new(Expr::ident("settlement_banks.*")),
                SelectItem::aliased(Expr::ident("system_nodes.name"), "node_name"),
            ])
            .join(JoinClause::left(
                "system_nodes",
                "system_nodes.id = settlement_banks.node_id",
            ))
            .and_where(Predicate::eq(Expr::ident("settlement_banks.is_active"), true))
            .order(OrderByClause::desc(Expr::ident("system_nodes.created_at")))
            .with_limit(10);

        let sql = query.render(&MySQLDialect::new());

        assert_eq!(
            sql,
            "SELECT `settlement_banks`.*, `system_nodes`.`name` AS node_name \
             FROM `settlement_banks` \
             LEFT JOIN `system_nodes` ON system_nodes.id = settlement_banks.node_id \
             WHERE `settlement_banks`.`is_active` = 1 \
             ORDER BY `system_nodes`.`created_at` DESC LIMIT 10"
        );
    }

    #[test]
    fn test_or_conditions_keep_false_seed() {
        let query = Query::new("users")
            .or_where(Predicate::compare(Expr::ident("role"), CompareOp::Eq, Expr::value("admin")))
            .or_where(Predicate::IsNotNull(Expr::ident("approved_at")));

        assert_eq!(
            query.render(&MySQLDialect::new()),
            "SELECT * FROM `users` WHERE FALSE OR `role` = 'admin' OR `approved_at` IS NOT NULL"
        );
    }

    #[test]
    fn test_where_never_keeps_true_and_prefix() {
        let dialect = MySQLDialect::new();
        let predicates = [
            Predicate::raw("a = 1"),
            Predicate::between("age", 1, 9),
            Predicate::not_in("id", vec![3, 4]),
        ];

        for count in 1..=predicates.len() {
            let query = Query::new("t").with_conditions(
                predicates[..count]
                    .iter()
                    .cloned()
                    .map(Condition::and)
                    .collect(),
            );
            let sql = query.render(&dialect);
            let where_part = &sql[sql.find("WHERE").unwrap()..];
            assert!(where_part.starts_with("WHERE "));
            assert!(!where_part.to_uppercase().contains("TRUE AND"));
        }
    }

    #[test]
    fn test_string_values_survive_collapse() {
        let query = Query::new("notes").and_where(Predicate::eq(
            Expr::ident("body"),
            "two  spaces\nand a newline",
        ));

        assert_eq!(
            query.render(&MySQLDialect::new()),
            "SELECT * FROM `notes` WHERE `body` = 'two  spaces\\nand a newline'"
        );
    }

    #[test]
    fn test_unlimited_with_offset() {
        let query = Query::new("logs").with_limit(20).unlimited().with_offset(50);
        assert_eq!(
            query.render(&MySQLDialect::new()),
            "SELECT * FROM `logs` OFFSET 50"
        );
        assert_eq!(
            query.to_statement(&MySQLDialect::new()).kind(),
            StatementKind::Select
        );
    }

    #[test]
    fn test_identifier_escaping() {
        assert_eq!(escape_identifier("orders.id"), "`orders`.`id`");
        assert_eq!(escape_identifier("odd`name"), "`odd-name`");
    }
}
