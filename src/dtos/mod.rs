pub mod accountdtos;
pub mod jobdtos;
pub mod responsedtos;
pub mod transactiondtos;
