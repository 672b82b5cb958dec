pub mod accountmodel;
pub mod disputemodel;
pub mod jobmodel;
pub mod kycmodel;
pub mod teammodel;
pub mod transactionmodel;
