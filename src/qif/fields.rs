use super::sections::SectionKind;
use crate::model::Header;

/// The semantic meaning of a single-letter field code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    AccountType,
    CreditLimit,
    BalanceDate,
    BalanceAmount,
    ExpenseFlag,
    IncomeFlag,
    TaxRelated,
    TaxSchedule,
    Budget,
    Date,
    Amount,
    LegacyAmount,
    Cleared,
    CheckNumber,
    Payee,
    Memo,
    Address,
    Category,
    SplitCategory,
    SplitMemo,
    SplitAmount,
    SecurityName,
    Price,
    Quantity,
    Commission,
    TransferAmount,
    Symbol,
    SecurityType,
    Goal,
    MemorizedKind,
    Amortization,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::AccountType => "type",
            Field::CreditLimit => "limit",
            Field::BalanceDate => "balance_date",
            Field::BalanceAmount => "balance_amount",
            Field::ExpenseFlag => "expense",
            Field::IncomeFlag => "income",
            Field::TaxRelated => "tax_related",
            Field::TaxSchedule => "tax_schedule",
            Field::Budget => "budget",
            Field::Date => "date",
            Field::Amount => "amount",
            Field::LegacyAmount => "amount_legacy",
            Field::Cleared => "cleared",
            Field::CheckNumber => "check_number",
            Field::Payee => "payee",
            Field::Memo => "memo",
            Field::Address => "address",
            Field::Category => "category",
            Field::SplitCategory => "split_category",
            Field::SplitMemo => "split_memo",
            Field::SplitAmount => "split_amount",
            Field::SecurityName => "security_name",
            Field::Price => "price",
            Field::Quantity => "quantity",
            Field::Commission => "commission",
            Field::TransferAmount => "transfer_amount",
            Field::Symbol => "symbol",
            Field::SecurityType => "security_type",
            Field::Goal => "goal",
            Field::MemorizedKind => "kind",
            Field::Amortization => "amortization",
        }
    }
}

pub type FieldTable = &'static [(char, Field)];

const ACCOUNT_FIELDS: FieldTable = &[
    ('N', Field::Name),
    ('D', Field::Description),
    ('T', Field::AccountType),
    ('L', Field::CreditLimit),
    ('/', Field::BalanceDate),
    ('$', Field::BalanceAmount),
];

const CATEGORY_FIELDS: FieldTable = &[
    ('N', Field::Name),
    ('D', Field::Description),
    ('E', Field::ExpenseFlag),
    ('I', Field::IncomeFlag),
    ('T', Field::TaxRelated),
    ('R', Field::TaxSchedule),
    ('B', Field::Budget),
];

const NAME_DESCRIPTION_FIELDS: FieldTable = &[('N', Field::Name), ('D', Field::Description)];

const MEMORIZED_FIELDS: FieldTable = &[
    ('K', Field::MemorizedKind),
    ('P', Field::Payee),
    ('T', Field::Amount),
    ('U', Field::LegacyAmount),
    ('C', Field::Cleared),
    ('M', Field::Memo),
    ('L', Field::Category),
    ('A', Field::Address),
    ('N', Field::CheckNumber),
    ('S', Field::SplitCategory),
    ('E', Field::SplitMemo),
    ('$', Field::SplitAmount),
    ('1', Field::Amortization),
    ('2', Field::Amortization),
    ('3', Field::Amortization),
    ('4', Field::Amortization),
    ('5', Field::Amortization),
    ('6', Field::Amortization),
    ('7', Field::Amortization),
];

const SECURITY_LIST_FIELDS: FieldTable = &[
    ('N', Field::Name),
    ('S', Field::Symbol),
    ('T', Field::SecurityType),
    ('D', Field::Description),
    ('G', Field::Goal),
];

const PAYEE_FIELDS: FieldTable = &[
    ('N', Field::Name),
    ('A', Field::Address),
    ('M', Field::Memo),
];

const TRANSACTION_FIELDS: FieldTable = &[
    ('D', Field::Date),
    ('T', Field::Amount),
    ('U', Field::LegacyAmount),
    ('C', Field::Cleared),
    ('N', Field::CheckNumber),
    ('P', Field::Payee),
    ('M', Field::Memo),
    ('A', Field::Address),
    ('L', Field::Category),
    ('S', Field::SplitCategory),
    ('E', Field::SplitMemo),
    ('$', Field::SplitAmount),
];

const INVESTMENT_FIELDS: FieldTable = &[
    ('Y', Field::SecurityName),
    ('I', Field::Price),
    ('Q', Field::Quantity),
    ('O', Field::Commission),
    ('$', Field::TransferAmount),
];

/// Resolves field codes for one kind of record. Lookup goes through the
/// investment overlay first (if any), then the primary table.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper {
    primary: FieldTable,
    overlay: Option<FieldTable>,
}

impl FieldMapper {
    /// The mapper for the records of a section. Unknown sections define no codes.
    pub fn for_section(kind: SectionKind) -> Self {
        let primary: FieldTable = match kind {
            SectionKind::Account => ACCOUNT_FIELDS,
            SectionKind::Category => CATEGORY_FIELDS,
            SectionKind::Tag | SectionKind::Class => NAME_DESCRIPTION_FIELDS,
            SectionKind::Memorized => MEMORIZED_FIELDS,
            SectionKind::Security => SECURITY_LIST_FIELDS,
            SectionKind::Payee => PAYEE_FIELDS,
            SectionKind::Transaction => TRANSACTION_FIELDS,
            SectionKind::Unknown => &[],
        };
        Self {
            primary,
            overlay: None,
        }
    }

    pub fn for_transaction(header: &Header) -> Self {
        Self {
            primary: TRANSACTION_FIELDS,
            overlay: header.is_investment().then_some(INVESTMENT_FIELDS),
        }
    }

    /// The overlay wins over the primary table: in `!Type:Invst` records `$`
    /// is the transfer amount, and investment records carry no splits.
    pub fn lookup(&self, code: char) -> Option<Field> {
        self.overlay
            .into_iter()
            .chain(std::iter::once(self.primary))
            .flat_map(|table| table.iter())
            .find(|(table_code, _)| *table_code == code)
            .map(|(_, field)| *field)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SectionKind::Account, 'L', Some(Field::CreditLimit))]
    #[case(SectionKind::Account, '/', Some(Field::BalanceDate))]
    #[case(SectionKind::Account, 'P', None)]
    #[case(SectionKind::Category, 'T', Some(Field::TaxRelated))]
    #[case(SectionKind::Category, 'R', Some(Field::TaxSchedule))]
    #[case(SectionKind::Tag, 'N', Some(Field::Name))]
    #[case(SectionKind::Tag, 'T', None)]
    #[case(SectionKind::Memorized, 'K', Some(Field::MemorizedKind))]
    #[case(SectionKind::Memorized, '4', Some(Field::Amortization))]
    #[case(SectionKind::Security, 'S', Some(Field::Symbol))]
    #[case(SectionKind::Payee, 'A', Some(Field::Address))]
    #[case(SectionKind::Transaction, '$', Some(Field::SplitAmount))]
    #[case(SectionKind::Transaction, 'Y', None)]
    fn section_tables(#[case] kind: SectionKind, #[case] code: char, #[case] expected: Option<Field>) {
        let mapper = FieldMapper::for_section(kind);
        assert_eq!(expected, mapper.lookup(code));
    }

    #[test]
    fn unknown_section_defines_no_codes() {
        let mapper = FieldMapper::for_section(SectionKind::Unknown);
        assert_eq!(None, mapper.lookup('N'));
    }

    #[test]
    fn investment_overlay_is_consulted_first() {
        let mapper = FieldMapper::for_transaction(&Header::transaction_type("!Type:Invst"));
        assert_eq!(Some(Field::TransferAmount), mapper.lookup('$'));
        assert_eq!(Some(Field::SecurityName), mapper.lookup('Y'));
        assert_eq!(Some(Field::Amount), mapper.lookup('T'));
        assert_eq!(None, mapper.lookup('Z'));
    }

    #[test]
    fn non_investment_records_never_see_the_overlay() {
        let mapper = FieldMapper::for_transaction(&Header::bank());
        assert_eq!(Some(Field::SplitAmount), mapper.lookup('$'));
        assert_eq!(None, mapper.lookup('Q'));
    }
}
