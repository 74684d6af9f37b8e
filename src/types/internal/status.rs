use serde::{Deserialize, Serialize};

/// Lead pipeline states. CONVERTED and LOST are terminal by workflow
/// convention; the data layer does not forbid writing past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    FollowUp,
    Converted,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::FollowUp => "FOLLOW_UP",
            LeadStatus::Converted => "CONVERTED",
            LeadStatus::Lost => "LOST",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NEW" => Some(LeadStatus::New),
            "CONTACTED" => Some(LeadStatus::Contacted),
            "FOLLOW_UP" => Some(LeadStatus::FollowUp),
            "CONVERTED" => Some(LeadStatus::Converted),
            "LOST" => Some(LeadStatus::Lost),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadSource {
    WalkIn,
    Referral,
    Phone,
    Website,
    SocialMedia,
    Other,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::WalkIn => "WALK_IN",
            LeadSource::Referral => "REFERRAL",
            LeadSource::Phone => "PHONE",
            LeadSource::Website => "WEBSITE",
            LeadSource::SocialMedia => "SOCIAL_MEDIA",
            LeadSource::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WALK_IN" => Some(LeadSource::WalkIn),
            "REFERRAL" => Some(LeadSource::Referral),
            "PHONE" => Some(LeadSource::Phone),
            "WEBSITE" => Some(LeadSource::Website),
            "SOCIAL_MEDIA" => Some(LeadSource::SocialMedia),
            "OTHER" => Some(LeadSource::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Pending,
    Active,
    Expired,
    Suspended,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "PENDING",
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Expired => "EXPIRED",
            MemberStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(MemberStatus::Pending),
            "ACTIVE" => Some(MemberStatus::Active),
            "EXPIRED" => Some(MemberStatus::Expired),
            "SUSPENDED" => Some(MemberStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Other,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Card => "CARD",
            PaymentMode::Upi => "UPI",
            PaymentMode::BankTransfer => "BANK_TRANSFER",
            PaymentMode::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CASH" => Some(PaymentMode::Cash),
            "CARD" => Some(PaymentMode::Card),
            "UPI" => Some(PaymentMode::Upi),
            "BANK_TRANSFER" => Some(PaymentMode::BankTransfer),
            "OTHER" => Some(PaymentMode::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Fixed => "FIXED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PERCENTAGE" => Some(DiscountType::Percentage),
            "FIXED" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    LeadFollowUp,
    PaymentDue,
    MembershipExpiring,
    NewMember,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LeadFollowUp => "LEAD_FOLLOW_UP",
            NotificationKind::PaymentDue => "PAYMENT_DUE",
            NotificationKind::MembershipExpiring => "MEMBERSHIP_EXPIRING",
            NotificationKind::NewMember => "NEW_MEMBER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Unread,
    Read,
    Dismissed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "UNREAD",
            NotificationStatus::Read => "READ",
            NotificationStatus::Dismissed => "DISMISSED",
        }
    }
}
