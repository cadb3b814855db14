/// A categorical attribute with a closed list of allowed values.
///
/// The option strings are sent to the service verbatim and must match what it
/// was trained on, spelling and punctuation included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalField {
    /// Wire name of the field
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Allowed values, first one is the default selection
    pub options: &'static [&'static str],
}

/// A non-negative integer attribute with a stepper increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericField {
    /// Wire name of the field
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Amount added or removed by one step up/down
    pub step: u64,
}

/// Either kind of field, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSpec {
    Numeric(&'static NumericField),
    Categorical(&'static CategoricalField),
}

pub const AGE: NumericField = NumericField { name: "age", label: "Age", step: 1 };
pub const FNLWGT: NumericField = NumericField { name: "fnlwgt", label: "Final Weight", step: 1000 };
pub const EDUCATIONAL_NUM: NumericField = NumericField {
    name: "educational-num",
    label: "Education Level",
    step: 1,
};
pub const CAPITAL_GAIN: NumericField = NumericField {
    name: "capital-gain",
    label: "Capital Gain",
    step: 100,
};
pub const CAPITAL_LOSS: NumericField = NumericField {
    name: "capital-loss",
    label: "Capital Loss",
    step: 100,
};
pub const HOURS_PER_WEEK: NumericField = NumericField {
    name: "hours-per-week",
    label: "Hours per Week",
    step: 1,
};

pub const WORKCLASS: CategoricalField = CategoricalField {
    name: "workclass",
    label: "Workclass",
    options: &[
        "Private",
        "Self-emp-not-inc",
        "Local-gov",
        "Others",
        "State-gov",
        "Self-emp-inc",
        "Federal-gov",
    ],
};

pub const MARITAL_STATUS: CategoricalField = CategoricalField {
    name: "marital-status",
    label: "Marital Status",
    options: &[
        "Never-married",
        "Married-civ-spouse",
        "Divorced",
        "Married-spouse-absent",
        "Separated",
        "Married-AF-spouse",
        "Widowed",
    ],
};

pub const OCCUPATION: CategoricalField = CategoricalField {
    name: "occupation",
    label: "Occupation",
    options: &[
        "Prof-specialty",
        "Craft-repair",
        "Exec-managerial",
        "Adm-clerical",
        "Sales",
        "Other-service",
        "Machine-op-inspct",
        "Others",
        "Transport-moving",
        "Handlers-cleaners",
        "Farming-fishing",
        "Tech-support",
        "Protective-serv",
        "Priv-house-serv",
        "Armed-Forces",
    ],
};

pub const RELATIONSHIP: CategoricalField = CategoricalField {
    name: "relationship",
    label: "Relationship",
    options: &[
        "Husband",
        "Not-in-family",
        "Own-child",
        "Unmarried",
        "Wife",
        "Other-relative",
    ],
};

pub const RACE: CategoricalField = CategoricalField {
    name: "race",
    label: "Race",
    options: &[
        "White",
        "Black",
        "Asian-Pac-Islander",
        "Amer-Indian-Eskimo",
        "Other",
    ],
};

pub const GENDER: CategoricalField = CategoricalField {
    name: "gender",
    label: "Gender",
    options: &["Male", "Female"],
};

pub const NATIVE_COUNTRY: CategoricalField = CategoricalField {
    name: "native-country",
    label: "Native Country",
    options: &[
        "United-States",
        "Cuba",
        "Jamaica",
        "India",
        "Mexico",
        "South",
        "Puerto-Rico",
        "Honduras",
        "England",
        "Canada",
        "Germany",
        "Iran",
        "Philippines",
        "Poland",
        "Columbia",
        "Cambodia",
        "Thailand",
        "Ecuador",
        "Laos",
        "Taiwan",
        "Haiti",
        "Portugal",
        "Dominican-Republic",
        "El-Salvador",
        "France",
        "Guatemala",
        "Italy",
        "China",
        "Japan",
        "Yugoslavia",
        "Peru",
        "Outlying-US(Guam-USVI-etc)",
        "Scotland",
        "Trinidad&Tobago",
        "Greece",
        "Nicaragua",
        "Vietnam",
        "Hong",
        "Ireland",
        "Hungary",
        "Holland-Netherlands",
    ],
};

/// Every field in the order the service expects them.
pub const WIRE_ORDER: [FieldSpec; 13] = [
    FieldSpec::Numeric(&AGE),
    FieldSpec::Categorical(&WORKCLASS),
    FieldSpec::Numeric(&FNLWGT),
    FieldSpec::Numeric(&EDUCATIONAL_NUM),
    FieldSpec::Categorical(&MARITAL_STATUS),
    FieldSpec::Categorical(&OCCUPATION),
    FieldSpec::Categorical(&RELATIONSHIP),
    FieldSpec::Categorical(&RACE),
    FieldSpec::Categorical(&GENDER),
    FieldSpec::Numeric(&CAPITAL_GAIN),
    FieldSpec::Numeric(&CAPITAL_LOSS),
    FieldSpec::Numeric(&HOURS_PER_WEEK),
    FieldSpec::Categorical(&NATIVE_COUNTRY),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_option_counts() {
        assert_eq!(WORKCLASS.options.len(), 7);
        assert_eq!(MARITAL_STATUS.options.len(), 7);
        assert_eq!(OCCUPATION.options.len(), 15);
        assert_eq!(RELATIONSHIP.options.len(), 6);
        assert_eq!(RACE.options.len(), 5);
        assert_eq!(GENDER.options.len(), 2);
        assert_eq!(NATIVE_COUNTRY.options.len(), 41);
    }

    #[test]
    fn test_field_names_unique() {
        let names: HashSet<_> = WIRE_ORDER
            .iter()
            .map(|spec| match spec {
                FieldSpec::Numeric(field) => field.name,
                FieldSpec::Categorical(field) => field.name,
            })
            .collect();
        assert_eq!(names.len(), WIRE_ORDER.len());
    }

    #[test]
    fn test_wire_order_boundaries() {
        assert_eq!(WIRE_ORDER[0], FieldSpec::Numeric(&AGE));
        assert_eq!(WIRE_ORDER[12], FieldSpec::Categorical(&NATIVE_COUNTRY));
    }

    #[test]
    fn test_options_preserved_verbatim() {
        assert!(NATIVE_COUNTRY.options.contains(&"Outlying-US(Guam-USVI-etc)"));
        assert!(NATIVE_COUNTRY.options.contains(&"Trinidad&Tobago"));
    }
}
