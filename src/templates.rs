// 📜 Boilerplate Text - fixed legal wording for letters and invoices
//
// Only the company name, dates and payment days vary; everything else is
// verbatim and must not be reflowed.

pub const LETTER_TITLE: &str = "ENGAGEMENT LETTER";
pub const LETTER_SUBJECT: &str = "Subject: Appointment as Trading Advisor";
pub const TERMS_HEADING: &str = "The terms and conditions for your appointment would be as under:";
pub const ANNEXURE_TITLE: &str = "Annexure A";
pub const TEAM_MEMBERS_NOTE: &str = "The following is the list of team members of the TA presently working with him which may change from time to time as per commercial prudence of the TA.";
pub const INSTRUCTION_NOTE: &str = "INSTRUCTION NOTE";
pub const PAYEE_DETAILS_NOTE: &str = "Details of payees to whom payment is to be made";

/// Company introduction paragraph
pub fn introduction(company: &str) -> String {
    format!(
        "{} (hereinafter referred to as “the Company”) is a company incorporated under the erstwhile provisions of the Companies Act, 1956 carrying on the business of securities trading across various market segments.",
        company
    )
}

pub const APPOINTMENT: &str = "Considering your expertise in the subject matter, the Company is desirous of appointing your goodself as a trading advisor (hereinafter referred to as “TA”) with respect to its trading operations and undertake trading activities on its behalf including but not limited to trading, jobbing, arbitrage, hedging etc.";

const FIXED_TERMS: [&str; 12] = [
    "The Company shall provide all the necessary infrastructure to you, including trading terminals of the Bombay Stock Exchange and the National Stock Exchange, trading/algo software, charting software, Wi-Fi, internet, web access, television, furniture and fixtures, electricity, water, air conditioning, telephone/s lines, etc.",
    "We understand that you would be assisted by your team members (hereinafter referred to as 'the team/team members'), the details of which are as per Annexure 'A'.",
    "You and your team shall be permitted to use the facilities described in para 1 above. You and team shall devote your skill, time, ability and attention to conducting trading/jobbing/arbitrage/hedging transactions/strategies on the exchange/s in the best interest of the Company. You and your team shall be responsible for all trading-related activities of the team.",
    "You shall execute/instruct to execute all the transactions in the Unique Client Code of the Company and only for the Company. The Company shall also provide the requisite funds to enable you to undertake transactions on the exchange/s through a SEBI registered Broker in the Company’s client code.",
    "You and your team agree to keep an interest-free security deposit, as may be mutually agreed from time to time, the proceeds of which will be utilized by the Company at its sole discretion.",
    "You and your team agree to carry on said business in complete confidentiality and shall not divulge trading positions, strategies, etc., or any other information related to the said business to anyone whatsoever.",
    "You shall charge fees for the services rendered by you and your team and shall periodically provide necessary instructions for disbursal of the same. The Company will make payment to you and your team as detailed in the instruction note after appropriate deduction of tax at source as per the provisions of the Income-tax Act, 1961.",
    "As mentioned earlier, you may also, if agreed upon by the Company, appoint/employ other persons referred to as your team to assist you in your trading activity. Your team agrees to abide by the terms and conditions as set out in this letter and confirm the same. New team members may be introduced from time to time at your sole discretion. Necessary intimation will be sent by you to the Company on introduction or removal of any team member.",
    "You and your team shall implement the terms of this agreement in good faith and due diligence in the best interest of the Company.",
    "Nothing in this arrangement shall constitute or be deemed to constitute a partnership, relationship of principal and agent or employer and employee between any of the parties, and none of them shall have any authority to bind any of the other parties in any way except for the purposes of the business of the Company.",
    "You or your team members shall not undertake any personal trading in the Unique Client Code of the Company under any circumstances. This shall be construed as 'unauthorized' trading activity and liable for damages by the Company.",
    "You and your team shall hereby comply with all the applicable rules and regulations, without limitation to, SEBI (Prohibition of Fraudulent and Unfair Trade Practices Relating to Securities Market) Regulations, Exchange guidelines and regulations, and any amendments and changes thereto, or any other act/s, and any such guidelines as may be prescribed from time to time by the Company.",
];

/// The 13 numbered contract terms; the last one names the start date
pub fn contract_terms(start_date: &str) -> Vec<String> {
    let mut terms: Vec<String> = FIXED_TERMS.iter().map(|t| t.to_string()).collect();
    terms.push(format!(
        "This arrangement shall be for one year from {}, but the Company reserves the right to terminate at any time without giving any prior notice or modify any terms and conditions of this letter from time to time as may be deemed necessary by the Company.",
        start_date
    ));
    terms
}

/// Single particulars line of the instruction note
pub fn particulars(start_year: i32) -> String {
    format!(
        "Being amount payable for the services rendered as per the engagement letter dated 1st April {}",
        start_year
    )
}

/// Invoice terms block, one line per condition
pub fn invoice_terms(payment_days: u32) -> String {
    format!(
        "Terms & Conditions:\n\
         1) E&OE\n\
         2) Please arrange to make the payments to payees as detailed in Annexure \"A\"\n\
         3) Please arrange to pay the said amount within {} working days.\n\
         4) You are requested to pay total amount Net of TDS and arrange to send TDS certificate.",
        payment_days
    )
}
