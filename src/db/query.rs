//! Search query construction: optional filters, sorting and pagination.
//!
//! Every query built here starts from [`invariants::active_only`], so the
//! active-record restriction applies whether or not any filter is present.

use std::fmt;
use std::str::FromStr;

use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use sea_orm::{Condition, ConnectionTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Select};

use crate::entities::{employees, prelude::*};
use crate::error::{AppError, Result};
use crate::invariants;
use crate::models::{Page, SearchCriteria};

/// Sort direction. Anything other than `DESC` (any case) sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Stored employee fields a page can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Department,
    Position,
    Salary,
    HireDate,
    ManagerId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(self) -> employees::Column {
        match self {
            Self::Id => employees::Column::Id,
            Self::FirstName => employees::Column::FirstName,
            Self::LastName => employees::Column::LastName,
            Self::Email => employees::Column::Email,
            Self::Phone => employees::Column::Phone,
            Self::Department => employees::Column::Department,
            Self::Position => employees::Column::Position,
            Self::Salary => employees::Column::Salary,
            Self::HireDate => employees::Column::HireDate,
            Self::ManagerId => employees::Column::ManagerId,
            Self::IsActive => employees::Column::IsActive,
            Self::CreatedAt => employees::Column::CreatedAt,
            Self::UpdatedAt => employees::Column::UpdatedAt,
        }
    }

    /// Wire (camelCase) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Department => "department",
            Self::Position => "position",
            Self::Salary => "salary",
            Self::HireDate => "hireDate",
            Self::ManagerId => "managerId",
            Self::IsActive => "isActive",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = AppError;

    /// Accepts the camelCase wire name or the snake_case column name.
    fn from_str(s: &str) -> Result<Self> {
        let field = match s.trim() {
            "id" => Self::Id,
            "firstName" | "first_name" => Self::FirstName,
            "lastName" | "last_name" => Self::LastName,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "department" => Self::Department,
            "position" => Self::Position,
            "salary" => Self::Salary,
            "hireDate" | "hire_date" => Self::HireDate,
            "managerId" | "manager_id" => Self::ManagerId,
            "isActive" | "is_active" => Self::IsActive,
            "createdAt" | "created_at" => Self::CreatedAt,
            "updatedAt" | "updated_at" => Self::UpdatedAt,
            other => {
                return Err(AppError::validation(format!(
                    "Unknown sort field '{other}'"
                )));
            }
        };
        Ok(field)
    }
}

/// LIMIT and OFFSET are bound as signed 64-bit integers.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u64 = MAX_OFFSET;

/// Validated page index, page size and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Row offset of the page, or `None` when it cannot be expressed as a
    /// SQL offset. Such a page lies past any possible result.
    pub fn offset(&self) -> Option<u64> {
        self.page.checked_mul(self.size).filter(|offset| *offset <= MAX_OFFSET)
    }

    pub fn new(page: u64, size: u64, sort_by: &str, sort_direction: &str) -> Result<Self> {
        if size == 0 {
            return Err(AppError::validation("Page size must be greater than 0"));
        }
        if size > MAX_PAGE_SIZE {
            return Err(AppError::validation(format!("Page size must not exceed {MAX_PAGE_SIZE}")));
        }
        Ok(Self {
            page,
            size,
            sort_field: sort_by.parse()?,
            direction: SortDirection::parse(sort_direction),
        })
    }
}

/// Optional search filters. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub term: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

impl SearchFilter {
    pub fn new(term: Option<&str>, department: Option<&str>, position: Option<&str>) -> Self {
        Self {
            term: non_blank(term),
            department: non_blank(department),
            position: non_blank(position),
        }
    }

    /// Conjunction of the present filters. Empty when nothing is set.
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = &self.term {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(employees::Column::FirstName, term))
                    .add(contains_ignore_case(employees::Column::LastName, term))
                    .add(contains_ignore_case(employees::Column::Email, term))
                    .add(contains_ignore_case(employees::Column::Department, term))
                    .add(contains_ignore_case(employees::Column::Position, term)),
            );
        }
        if let Some(department) = &self.department {
            condition = condition.add(eq_ignore_case(employees::Column::Department, department));
        }
        if let Some(position) = &self.position {
            condition = condition.add(eq_ignore_case(employees::Column::Position, position));
        }

        condition
    }
}

impl From<&SearchCriteria> for SearchFilter {
    fn from(criteria: &SearchCriteria) -> Self {
        Self::new(
            criteria.search_term.as_deref(),
            criteria.department.as_deref(),
            criteria.position.as_deref(),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// `LOWER(employees.<col>)`
pub fn lower(column: employees::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((Employees, column))))
}

/// Case-insensitive equality. Both sides are folded by the database so the
/// comparison uses one notion of case.
pub fn eq_ignore_case(column: employees::Column, value: &str) -> SimpleExpr {
    lower(column).eq(Func::lower(Expr::val(value)))
}

/// Case-insensitive substring match; LIKE wildcards in `term` match literally.
pub fn contains_ignore_case(column: employees::Column, term: &str) -> SimpleExpr {
    like_lower(lower(column), term)
}

/// `<expr> LIKE LOWER('%term%') ESCAPE '\'`. `expr` must already be lowercased.
pub fn like_lower(expr: Expr, term: &str) -> SimpleExpr {
    let pattern = SimpleExpr::Binary(
        Box::new(Func::lower(Expr::val(contains_pattern(term))).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant(LIKE_ESCAPE.into())),
    );
    expr.binary(BinOper::Like, pattern)
}

const LIKE_ESCAPE: char = '\\';

/// `%term%` with `\`, `%` and `_` escaped. Case is left to the database.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Requested ordering first, then last name, first name and id so that
/// pages are stable across requests.
pub fn apply_sort(select: Select<Employees>, request: &PageRequest) -> Select<Employees> {
    select
        .order_by(request.sort_field.column(), request.direction.order())
        .order_by_asc(employees::Column::LastName)
        .order_by_asc(employees::Column::FirstName)
        .order_by_asc(employees::Column::Id)
}

/// Active employees matching `filter`, one page of them.
pub fn search_select(filter: &SearchFilter, request: &PageRequest) -> Select<Employees> {
    apply_sort(invariants::active_only().filter(filter.condition()), request)
}

/// Run `select` for the requested page. A page past the end is empty, not an error.
pub async fn fetch_page<C>(db: &C, select: Select<Employees>, request: &PageRequest) -> Result<Page<employees::Model>>
where
    C: ConnectionTrait,
{
    let paginator = select.paginate(db, request.size);
    let total = paginator.num_items().await?;
    let content = match request.offset() {
        Some(offset) if offset < total => paginator.fetch_page(request.page).await?,
        _ => Vec::new(),
    };

    Ok(Page::new(content, request.page, request.size, total))
}

/// Filtered, sorted, paginated active employees.
pub async fn search<C>(db: &C, filter: &SearchFilter, request: &PageRequest) -> Result<Page<employees::Model>>
where
    C: ConnectionTrait,
{
    fetch_page(db, search_select(filter, request), request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("Desc "), SortDirection::Desc);
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Asc);
    }

    #[test]
    fn test_sort_field_accepts_wire_and_column_names() {
        assert_eq!("firstName".parse::<SortField>().unwrap(), SortField::FirstName);
        assert_eq!("first_name".parse::<SortField>().unwrap(), SortField::FirstName);
        assert_eq!("hireDate".parse::<SortField>().unwrap(), SortField::HireDate);
        assert_eq!("salary".parse::<SortField>().unwrap(), SortField::Salary);
        assert_eq!(SortField::ManagerId.to_string(), "managerId");
    }

    #[test]
    fn test_sort_field_rejects_unknown() {
        let err = "password".parse::<SortField>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Unknown sort field 'password'");

        assert!("fullName".parse::<SortField>().is_err());
        assert!("FIRSTNAME".parse::<SortField>().is_err());
    }

    #[test]
    fn test_page_request_validation() {
        let request = PageRequest::new(2, 25, "lastName", "desc").unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.size, 25);
        assert_eq!(request.sort_field, SortField::LastName);
        assert_eq!(request.direction, SortDirection::Desc);

        assert!(matches!(PageRequest::new(0, 0, "lastName", "asc"), Err(AppError::Validation(_))));
        assert!(matches!(PageRequest::new(0, 10, "nope", "asc"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_filter_treats_blank_as_absent() {
        let filter = SearchFilter::new(Some("  "), Some(""), None);
        assert_eq!(filter, SearchFilter::default());

        let filter = SearchFilter::new(Some(" ann "), Some("Sales"), Some("Rep"));
        assert_eq!(filter.term.as_deref(), Some("ann"));
        assert_eq!(filter.department.as_deref(), Some("Sales"));
        assert_eq!(filter.position.as_deref(), Some("Rep"));
    }

    #[test]
    fn test_page_offset_overflow() {
        let request = PageRequest::new(3, 25, "lastName", "asc").unwrap();
        assert_eq!(request.offset(), Some(75));

        let request = PageRequest::new(u64::MAX, 1, "lastName", "asc").unwrap();
        assert_eq!(request.offset(), None);

        let request = PageRequest::new(1 << 63, 2, "lastName", "asc").unwrap();
        assert_eq!(request.offset(), None);

        let request = PageRequest::new(1, i64::MAX as u64, "lastName", "asc").unwrap();
        assert_eq!(request.offset(), Some(i64::MAX as u64));
    }

    #[test]
    fn test_page_size_upper_bound() {
        assert!(PageRequest::new(0, i64::MAX as u64, "lastName", "asc").is_ok());
        assert!(matches!(
            PageRequest::new(0, u64::MAX, "lastName", "asc"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_case_folding_happens_in_sql() {
        let request = PageRequest::new(0, 10, "lastName", "asc").unwrap();
        let sql = search_select(&SearchFilter::new(Some("Ann"), Some("Sales"), None), &request)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("employees"."department") = LOWER('Sales')"#));
        assert!(sql.contains(r#"LOWER("employees"."first_name") LIKE LOWER('%Ann%') ESCAPE"#));
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Ann"), "%Ann%");
        assert_eq!(contains_pattern("ÉMILE"), "%ÉMILE%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn test_search_select_always_scopes_to_active() {
        let request = PageRequest::new(0, 10, "lastName", "asc").unwrap();

        let unfiltered = search_select(&SearchFilter::default(), &request)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(unfiltered.contains(r#""employees"."is_active" = TRUE"#));
        assert!(!unfiltered.contains("LIKE"));

        let filtered = search_select(&SearchFilter::new(Some("ann"), Some("Sales"), None), &request)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(filtered.contains(r#""employees"."is_active" = TRUE"#));
        assert!(filtered.contains("LIKE"));
        assert!(filtered.contains("LOWER"));
    }

    #[test]
    fn test_search_select_orders_requested_field_first() {
        let request = PageRequest::new(0, 10, "salary", "DESC").unwrap();
        let sql = search_select(&SearchFilter::default(), &request)
            .build(DbBackend::Postgres)
            .to_string();

        let order_by = &sql[sql.find("ORDER BY").unwrap()..];
        let salary = order_by.find(r#""salary" DESC"#).unwrap();
        let last_name = order_by.find(r#""last_name" ASC"#).unwrap();
        let id = order_by.find(r#""id" ASC"#).unwrap();
        assert!(salary < last_name);
        assert!(last_name < id);
    }
}
