use uuid::Uuid;

use super::order::{Address, CustomerType, OrderDraft};

labelled_enum! {
    pub enum Role {
        Client => "client",
        Admin => "admin",
    }
}

labelled_enum! {
    pub enum AccountType {
        Individual => "individual",
        Company => "company",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub company_name: String,
    pub vat_number: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub invoice_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub account_type: AccountType,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub shipping_address: Option<Address>,
    pub company: Option<CompanyProfile>,
}

impl UserProfile {
    /// Applies a company upgrade. The account type only ever moves to company.
    pub fn apply_company_upgrade(&mut self, upgrade: &CompanyUpgrade) {
        self.account_type = AccountType::Company;
        self.email = Some(upgrade.email.clone());
        self.phone = Some(upgrade.phone.clone());
        self.shipping_address = Some(upgrade.shipping_address.clone());
        self.company = Some(upgrade.company.clone());
    }
}

/// Profile patch derived from a committed company order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyUpgrade {
    pub email: String,
    pub phone: String,
    pub shipping_address: Address,
    pub company: CompanyProfile,
}

impl CompanyUpgrade {
    /// Individual orders yield nothing: they never touch the profile.
    pub fn from_order(draft: &OrderDraft) -> Option<Self> {
        if draft.customer_type != CustomerType::Company {
            return None;
        }
        let company = draft.company.as_ref()?;
        Some(Self {
            email: draft.customer.email.clone(),
            phone: draft.customer.phone.clone(),
            shipping_address: draft.shipping_address.clone(),
            company: CompanyProfile {
                company_name: company.company_name.clone(),
                vat_number: company.vat_number.clone(),
                contact_person: Some(company.contact_person.clone()),
                email: Some(draft.customer.email.clone()),
                phone: Some(draft.customer.phone.clone()),
                invoice_address: Some(draft.shipping_address.clone()),
            },
        })
    }
}
