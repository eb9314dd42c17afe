//! Form-style catalog: one uppercase label per line, value to end of line.
//!
//! Labels keep the spellings found on the closing forms in circulation
//! (`MONHLY`, `COVERGAE`, `INUSRARANCE`); the corrected spellings are
//! registered as aliases.

use crate::error::CatalogError;

use super::super::rules::Normalizer;
use super::{Catalog, Derivation, FieldDef};

const PENALTY_YEARS: [&str; 5] = [
    "penalty_year_1",
    "penalty_year_2",
    "penalty_year_3",
    "penalty_year_4",
    "penalty_year_5",
];

pub(super) fn build() -> Result<Catalog, CatalogError> {
    let mut builder = Catalog::builder("line")
        .sections(&[
            "owner",
            "company",
            "property",
            "title_company",
            "purchase_or_refi",
            "loan",
            "taxes",
            "insurance",
            "lease",
        ])
        // owner
        .field(FieldDef::line("owner_name", "OWNER NAME", Normalizer::Text))
        .field(FieldDef::line("owner_phone_number", "OWNER PHONE NUMBER", Normalizer::Text))
        .field(FieldDef::line("owner_email_address", "OWNER EMAIL ADDRESS", Normalizer::Text))
        .derive(Derivation::Owners {
            names: "owner_name".to_string(),
            email: Some("owner_email_address".to_string()),
            phone: Some("owner_phone_number".to_string()),
            destination: "owner.individuals".to_string(),
        })
        .field(
            FieldDef::line("owner_principal_address", "OWNER PRINCIPAL ADDRESS", Normalizer::Text)
                .to("owner.principal_address"),
        )
        // company
        .field(FieldDef::line("company_name", "COMPANY NAME", Normalizer::Text).to("company.name"))
        .field(FieldDef::line("company_address", "COMPANY ADDRESS", Normalizer::Text).to("company.address"))
        .field(FieldDef::line("company_phone_number", "COMPANY PHONE NUMBER", Normalizer::Text).to("company.phone"))
        .field(FieldDef::line("company_email_address", "COMPANY EMAIL ADDRESS", Normalizer::Text).to("company.email"))
        // property
        .field(FieldDef::line("property_address", "PROPERTY ADDRESS", Normalizer::Text).to("property.address"))
        .field(FieldDef::line("city", "CITY", Normalizer::Text).to("property.city"))
        .field(FieldDef::line("state", "STATE", Normalizer::Text).to("property.state"))
        .field(FieldDef::line("zip_code", "ZIP CODE", Normalizer::Raw).or("ZIP").to("property.zip"))
        .field(
            FieldDef::line(
                "property_address_legal_description",
                "PROPERTY ADDRESS LEGAL DESCRIPTION",
                Normalizer::Text,
            )
            .to("property.legal_description"),
        )
        .field(FieldDef::line("property_type", "PROPERTY TYPE", Normalizer::Text).to("property.type"))
        .field(
            FieldDef::line("property_sqf", "PROPERTY SQF", Normalizer::Currency)
                .or("PROPERTY SQFT")
                .to("property.sqft"),
        )
        .field(
            FieldDef::line("construction_year", "CONSTRUCTION YEAR", Normalizer::Integer)
                .to("property.year_built"),
        )
        .field(FieldDef::line("property_type_2", "PROPERTY TYPE 2", Normalizer::Text).to("property.use_type"))
        .field(
            FieldDef::line("property_owner", "PROPERTY OWNER", Normalizer::Text)
                .to("property.owner_of_record"),
        )
        // title company
        .field(FieldDef::line("title_company", "TITLE COMPANY", Normalizer::Text).to("title_company.name"))
        .field(
            FieldDef::line("title_company_contact", "TITLE COMPANY CONTACT", Normalizer::Text)
                .to("title_company.contact"),
        )
        .field(
            FieldDef::line("title_company_phone_number", "TITLE COMPANY PHONE NUMBER", Normalizer::Text)
                .to("title_company.phone"),
        )
        .field(
            FieldDef::line("title_company_email_address", "TITLE COMPANY EMAIL ADDRESS", Normalizer::Text)
                .to("title_company.email"),
        )
        // purchase or refinance
        .derive(Derivation::TransactionKind {
            destination: "purchase_or_refi.kind".to_string(),
        })
        .field(
            FieldDef::line("purchase_price", "PURCHASE PRICE / REFINANCE PRICE", Normalizer::Currency)
                .or("PURCHASE PRICE/REFINANCE PRICE")
                .or("PURCHASE PRICE")
                .or("REFINANCE PRICE")
                .to("purchase_or_refi.price_or_amount"),
        )
        .field(
            FieldDef::line("purchase_closing_date", "PURCHASE/REFINANCE CLOSING DATE", Normalizer::Date)
                .or("PURCHASE / REFINANCE CLOSING DATE")
                .or("CLOSING DATE")
                .to("purchase_or_refi.closing_date"),
        )
        // loan: lender and servicer
        .field(FieldDef::line("lender_mortgage_name", "LENDER MORTGAGE NAME", Normalizer::Text).to("loan.lender.name"))
        .field(
            FieldDef::line("lender_mortgage_address", "LENDER MORTGAGE ADDRESS", Normalizer::Text)
                .to("loan.lender.address"),
        )
        .field(
            FieldDef::line("lender_mortgage_phone", "LENDER MORTGAGE PHONE", Normalizer::Text)
                .to("loan.lender.phone"),
        )
        .field(
            FieldDef::line("lender_mortgage_web_page", "LENDER MORTGAGE WEB PAGE", Normalizer::Text)
                .to("loan.lender.website"),
        )
        .field(
            FieldDef::line("mortgage_servicing_company", "MORTGAGE SERVICING COMPANY", Normalizer::Text)
                .to("loan.servicer.name"),
        )
        .field(
            FieldDef::line(
                "mortgage_servicing_company_address",
                "MORTGAGE SERVICING COMPANY ADDRESS",
                Normalizer::Text,
            )
            .to("loan.servicer.address"),
        )
        .field(
            FieldDef::line(
                "mortgage_servicing_company_phone_number",
                "MORTGAGE SERVICING COMPANY PHONE NUMBER",
                Normalizer::Text,
            )
            .to("loan.servicer.phone"),
        )
        .field(FieldDef::line("lender_web_page", "LENDER WEB PAGE", Normalizer::Text).to("loan.servicer.website"))
        // loan: terms
        .field(FieldDef::line("loan_number", "LOAN NUMBER", Normalizer::Raw).to("loan.loan_number"))
        .field(FieldDef::line("loan_amount", "LOAN AMOUNT", Normalizer::Currency).to("loan.principal"))
        .field(
            FieldDef::line("interest_rate", "INTEREST RATE", Normalizer::Percentage)
                .to("loan.interest_rate_apy"),
        )
        .field(
            FieldDef::line("term_years", "TERM -YEARS", Normalizer::Integer)
                .or("TERM - YEARS")
                .or("TERM YEARS")
                .to("loan.term_years"),
        )
        .field(
            FieldDef::line("first_payment_date", "FIRST PAYMENT DATE", Normalizer::Date)
                .to("loan.first_payment_date"),
        )
        .field(
            FieldDef::line(
                "monthly_payment_principal_interest",
                "MONHLY PAYMENT PRICIPAL + INTEREST",
                Normalizer::Currency,
            )
            .or("MONTHLY PAYMENT PRINCIPAL + INTEREST")
            .to("loan.monthly_pi"),
        )
        .field(
            FieldDef::line("escrow_property_tax", "ESCROW - PROPERTY TAX", Normalizer::Currency)
                .to("loan.escrow_property_tax"),
        )
        .field(
            FieldDef::line(
                "escrow_home_owner_insurance",
                "ESCROW - HOME OWNER INSURANCE",
                Normalizer::Currency,
            )
            .to("loan.escrow_insurance"),
        )
        .field(
            FieldDef::line("total_monthly_payment_piti", "TOTAL MONTLY PAYMENT P.I.T.I", Normalizer::Currency)
                .or("TOTAL MONTHLY PAYMENT P.I.T.I")
                .or("TOTAL MONTHLY PAYMENT PITI")
                .to("loan.monthly_piti"),
        )
        .field(
            FieldDef::line("pre_payment_penalty", "PRE-PAYMENT PENALTY", Normalizer::Boolean)
                .or("PREPAYMENT PENALTY")
                .to("loan.prepayment_penalty"),
        );

    for (i, name) in PENALTY_YEARS.iter().enumerate() {
        builder = builder.field(FieldDef::line(*name, format!("YEAR {}", i + 1), Normalizer::Percentage));
    }

    builder
        .derive(Derivation::PenaltySchedule {
            years: PENALTY_YEARS.iter().map(|name| name.to_string()).collect(),
            destination: "loan.prepay_steps".to_string(),
        })
        // taxes
        .field(FieldDef::line("property_tax_county", "PROPERTY TAX COUNTY", Normalizer::Text).to("taxes.county"))
        .field(FieldDef::line("tax_authority", "TAX AUTHORITY", Normalizer::Text).to("taxes.authority"))
        .field(
            FieldDef::line("tax_authority_web_page", "TAX AUTHORITY WEB PAGE", Normalizer::Text)
                .to("taxes.website"),
        )
        .field(FieldDef::line("account_number", "ACCOUNT NUMBER", Normalizer::Raw).to("taxes.account_number"))
        .field(
            FieldDef::line("assesed_value", "ASSESED VALUE", Normalizer::Currency)
                .or("ASSESSED VALUE")
                .to("taxes.assessed_value"),
        )
        .field(
            FieldDef::line("taxes_paid_last_year", "TAXES PAID LAST YEAR", Normalizer::Currency)
                .to("taxes.last_year_taxes"),
        )
        .field(
            FieldDef::line("property_tax_percent", "PROPERTY TAX %", Normalizer::Percentage)
                .to("taxes.tax_rate_pct"),
        )
        .field(
            FieldDef::line(
                "property_taxes_initial_escrow",
                "PROPERTY TAXES INITIAL ESCROW",
                Normalizer::Currency,
            )
            .to("taxes.initial_escrow"),
        )
        // insurance
        .field(FieldDef::line("insurance_company", "INSURANCE COMPANY", Normalizer::Text).to("insurance.carrier"))
        .field(
            FieldDef::line("insurance_agent_name", "INUSRARANCE AGENT NAME", Normalizer::Text)
                .or("INSURANCE AGENT NAME")
                .to("insurance.agent_company"),
        )
        .field(
            FieldDef::line("insurance_agent_contact", "INSURANCE AGENT CONTACT", Normalizer::Text)
                .to("insurance.agent_contacts"),
        )
        .field(
            FieldDef::line("insurance_agent_phone_number", "INSURANCE AGENT PHONE NUMBER", Normalizer::Text)
                .to("insurance.agent_phone"),
        )
        .field(
            FieldDef::line("insurance_agent_email_address", "INSURANCE AGENT EMAIL ADDRESS", Normalizer::Text)
                .to("insurance.agent_email"),
        )
        .field(
            FieldDef::line("hoi_effective_date", "H.O.I EFFECTIVE DATE", Normalizer::Date)
                .or("HOI EFFECTIVE DATE")
                .to("insurance.effective_date"),
        )
        .field(
            FieldDef::line("hoi_expiration_date", "H.O.I EXPIRATION DATE", Normalizer::Date)
                .or("HOI EXPIRATION DATE")
                .to("insurance.expiration_date"),
        )
        .field(FieldDef::line("policy_number", "POLICY NUMBER", Normalizer::Raw).to("insurance.policy_number"))
        .field(
            FieldDef::line(
                "home_owner_insurance_initial_premium",
                "HOME OWNER INSURANCE INITIAL PREMIUM",
                Normalizer::Currency,
            )
            .to("insurance.premiums.initial"),
        )
        .field(
            FieldDef::line(
                "home_owner_insurance_initial_escrow",
                "HOME OWNER INSURANCE INITIAL ESCROW",
                Normalizer::Currency,
            )
            .to("insurance.premiums.initial_escrow"),
        )
        .field(
            FieldDef::line("coverage_a_dwelling", "COVERGAE A - DWELLING", Normalizer::Currency)
                .or("COVERAGE A - DWELLING")
                .to("insurance.coverages.dwelling"),
        )
        .field(
            FieldDef::line("coverage_b_other_structures", "COVERAGE B - OTHER STRUCTURES", Normalizer::Currency)
                .to("insurance.coverages.other_structures"),
        )
        .field(
            FieldDef::line("coverage_c_personal_property", "COVERAGE C - PERSONAL PROPERTY", Normalizer::Currency)
                .to("insurance.coverages.personal_property"),
        )
        .field(
            FieldDef::line("coverage_d_fair_rental_value", "COVERAGE D - FAIR RENTAL VALUE", Normalizer::Currency)
                .to("insurance.coverages.fair_rental_value"),
        )
        .field(
            FieldDef::line(
                "coverage_e_additional_living_expenses",
                "COVERAGE E - ADDITIONAL LIVING EXPENSES",
                Normalizer::Currency,
            )
            .to("insurance.coverages.additional_living_expenses"),
        )
        // lease
        .field(
            FieldDef::line("initial_lease_tenant_name", "INITIAL LEASE - TENANT NAME", Normalizer::Text)
                .to("lease.tenant_name"),
        )
        .field(
            FieldDef::line("lease_effective_date", "LEASE EFFCETIVE DATE", Normalizer::Date)
                .or("LEASE EFFECTIVE DATE")
                .to("lease.start_date"),
        )
        .field(
            FieldDef::line("lease_termination_date", "LEASE TERMINATION DATE", Normalizer::Date)
                .to("lease.end_date"),
        )
        .field(
            FieldDef::line("gross_monthly_income_rent", "GROSS MONTHLY INCOME (RENT)", Normalizer::Currency)
                .or("GROSS MONTHLY INCOME")
                .to("lease.monthly_rent"),
        )
        .field(
            FieldDef::line("property_management_percent", "PROPERTY MANAGEMENT %", Normalizer::Percentage)
                .to("lease.pm_fee_pct"),
        )
        .field(
            FieldDef::line("property_management_amount", "PROPERTY MANAGEMENT AMOUNT", Normalizer::Currency)
                .to("lease.pm_fee_amount"),
        )
        .field(
            FieldDef::line("net_monthly_income", "NET MONTHLY INCOME", Normalizer::Currency)
                .to("lease.net_monthly_income"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = build().unwrap();

        assert_eq!(catalog.sections().len(), 9);
        assert_eq!(catalog.derived().len(), 3);
        assert!(catalog.field("owner_name").unwrap().destination.is_none());
        assert!(catalog.field("penalty_year_3").unwrap().destination.is_none());
    }

    #[test]
    fn test_prefix_labels_resolve_to_longest() {
        let catalog = build().unwrap();
        let name_of = |line: &str| {
            catalog
                .match_line_label(line, true)
                .map(|(idx, _)| catalog.fields()[idx].name.as_str())
        };

        assert_eq!(name_of("PROPERTY TYPE 2 Rental"), Some("property_type_2"));
        assert_eq!(name_of("PROPERTY TYPE Single Family"), Some("property_type"));
        assert_eq!(name_of("PROPERTY ADDRESS LEGAL DESCRIPTION Lot 4"), Some("property_address_legal_description"));
        assert_eq!(name_of("TITLE COMPANY CONTACT Ann Lee"), Some("title_company_contact"));
        assert_eq!(name_of("PROPERTY TAX % 1.8"), Some("property_tax_percent"));
        assert_eq!(name_of("Monthly Payment Principal + Interest 1,200"), Some("monthly_payment_principal_interest"));
        assert_eq!(name_of("YEAR 10 3%"), None);
    }
}
