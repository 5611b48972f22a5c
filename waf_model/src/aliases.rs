// Per-operation names for the generic envelopes, matching the request and
// response names the service documents (`UpdateIPSetRequest`, ...).

use crate::envelope::{
    ChangeReceipt, CreateRequest, CreateResponse, DeleteRequest, GetRequest, GetResponse,
    ListRequest, Page, UpdateRequest,
};
use crate::rules::{RateBasedRule, Rule, RuleGroup, WebACL};
use crate::sets::{
    ByteMatchSet, GeoMatchSet, IPSet, RegexMatchSet, RegexPatternSet, SizeConstraintSet,
    SqlInjectionMatchSet, XssMatchSet,
};

pub type CreateByteMatchSetRequest = CreateRequest<ByteMatchSet>;
pub type CreateByteMatchSetResponse = CreateResponse<ByteMatchSet>;
pub type GetByteMatchSetRequest = GetRequest<ByteMatchSet>;
pub type GetByteMatchSetResponse = GetResponse<ByteMatchSet>;
pub type UpdateByteMatchSetRequest = UpdateRequest<ByteMatchSet>;
pub type UpdateByteMatchSetResponse = ChangeReceipt;
pub type DeleteByteMatchSetRequest = DeleteRequest<ByteMatchSet>;
pub type DeleteByteMatchSetResponse = ChangeReceipt;
pub type ListByteMatchSetsRequest = ListRequest<ByteMatchSet>;
pub type ListByteMatchSetsResponse = Page<ByteMatchSet>;

pub type CreateGeoMatchSetRequest = CreateRequest<GeoMatchSet>;
pub type CreateGeoMatchSetResponse = CreateResponse<GeoMatchSet>;
pub type GetGeoMatchSetRequest = GetRequest<GeoMatchSet>;
pub type GetGeoMatchSetResponse = GetResponse<GeoMatchSet>;
pub type UpdateGeoMatchSetRequest = UpdateRequest<GeoMatchSet>;
pub type UpdateGeoMatchSetResponse = ChangeReceipt;
pub type DeleteGeoMatchSetRequest = DeleteRequest<GeoMatchSet>;
pub type DeleteGeoMatchSetResponse = ChangeReceipt;
pub type ListGeoMatchSetsRequest = ListRequest<GeoMatchSet>;
pub type ListGeoMatchSetsResponse = Page<GeoMatchSet>;

pub type CreateIPSetRequest = CreateRequest<IPSet>;
pub type CreateIPSetResponse = CreateResponse<IPSet>;
pub type GetIPSetRequest = GetRequest<IPSet>;
pub type GetIPSetResponse = GetResponse<IPSet>;
pub type UpdateIPSetRequest = UpdateRequest<IPSet>;
pub type UpdateIPSetResponse = ChangeReceipt;
pub type DeleteIPSetRequest = DeleteRequest<IPSet>;
pub type DeleteIPSetResponse = ChangeReceipt;
pub type ListIPSetsRequest = ListRequest<IPSet>;
pub type ListIPSetsResponse = Page<IPSet>;

pub type CreateRegexMatchSetRequest = CreateRequest<RegexMatchSet>;
pub type CreateRegexMatchSetResponse = CreateResponse<RegexMatchSet>;
pub type GetRegexMatchSetRequest = GetRequest<RegexMatchSet>;
pub type GetRegexMatchSetResponse = GetResponse<RegexMatchSet>;
pub type UpdateRegexMatchSetRequest = UpdateRequest<RegexMatchSet>;
pub type UpdateRegexMatchSetResponse = ChangeReceipt;
pub type DeleteRegexMatchSetRequest = DeleteRequest<RegexMatchSet>;
pub type DeleteRegexMatchSetResponse = ChangeReceipt;
pub type ListRegexMatchSetsRequest = ListRequest<RegexMatchSet>;
pub type ListRegexMatchSetsResponse = Page<RegexMatchSet>;

pub type CreateRegexPatternSetRequest = CreateRequest<RegexPatternSet>;
pub type CreateRegexPatternSetResponse = CreateResponse<RegexPatternSet>;
pub type GetRegexPatternSetRequest = GetRequest<RegexPatternSet>;
pub type GetRegexPatternSetResponse = GetResponse<RegexPatternSet>;
pub type UpdateRegexPatternSetRequest = UpdateRequest<RegexPatternSet>;
pub type UpdateRegexPatternSetResponse = ChangeReceipt;
pub type DeleteRegexPatternSetRequest = DeleteRequest<RegexPatternSet>;
pub type DeleteRegexPatternSetResponse = ChangeReceipt;
pub type ListRegexPatternSetsRequest = ListRequest<RegexPatternSet>;
pub type ListRegexPatternSetsResponse = Page<RegexPatternSet>;

pub type CreateSizeConstraintSetRequest = CreateRequest<SizeConstraintSet>;
pub type CreateSizeConstraintSetResponse = CreateResponse<SizeConstraintSet>;
pub type GetSizeConstraintSetRequest = GetRequest<SizeConstraintSet>;
pub type GetSizeConstraintSetResponse = GetResponse<SizeConstraintSet>;
pub type UpdateSizeConstraintSetRequest = UpdateRequest<SizeConstraintSet>;
pub type UpdateSizeConstraintSetResponse = ChangeReceipt;
pub type DeleteSizeConstraintSetRequest = DeleteRequest<SizeConstraintSet>;
pub type DeleteSizeConstraintSetResponse = ChangeReceipt;
pub type ListSizeConstraintSetsRequest = ListRequest<SizeConstraintSet>;
pub type ListSizeConstraintSetsResponse = Page<SizeConstraintSet>;

pub type CreateSqlInjectionMatchSetRequest = CreateRequest<SqlInjectionMatchSet>;
pub type CreateSqlInjectionMatchSetResponse = CreateResponse<SqlInjectionMatchSet>;
pub type GetSqlInjectionMatchSetRequest = GetRequest<SqlInjectionMatchSet>;
pub type GetSqlInjectionMatchSetResponse = GetResponse<SqlInjectionMatchSet>;
pub type UpdateSqlInjectionMatchSetRequest = UpdateRequest<SqlInjectionMatchSet>;
pub type UpdateSqlInjectionMatchSetResponse = ChangeReceipt;
pub type DeleteSqlInjectionMatchSetRequest = DeleteRequest<SqlInjectionMatchSet>;
pub type DeleteSqlInjectionMatchSetResponse = ChangeReceipt;
pub type ListSqlInjectionMatchSetsRequest = ListRequest<SqlInjectionMatchSet>;
pub type ListSqlInjectionMatchSetsResponse = Page<SqlInjectionMatchSet>;

pub type CreateXssMatchSetRequest = CreateRequest<XssMatchSet>;
pub type CreateXssMatchSetResponse = CreateResponse<XssMatchSet>;
pub type GetXssMatchSetRequest = GetRequest<XssMatchSet>;
pub type GetXssMatchSetResponse = GetResponse<XssMatchSet>;
pub type UpdateXssMatchSetRequest = UpdateRequest<XssMatchSet>;
pub type UpdateXssMatchSetResponse = ChangeReceipt;
pub type DeleteXssMatchSetRequest = DeleteRequest<XssMatchSet>;
pub type DeleteXssMatchSetResponse = ChangeReceipt;
pub type ListXssMatchSetsRequest = ListRequest<XssMatchSet>;
pub type ListXssMatchSetsResponse = Page<XssMatchSet>;

pub type CreateRuleRequest = CreateRequest<Rule>;
pub type CreateRuleResponse = CreateResponse<Rule>;
pub type GetRuleRequest = GetRequest<Rule>;
pub type GetRuleResponse = GetResponse<Rule>;
pub type UpdateRuleRequest = UpdateRequest<Rule>;
pub type UpdateRuleResponse = ChangeReceipt;
pub type DeleteRuleRequest = DeleteRequest<Rule>;
pub type DeleteRuleResponse = ChangeReceipt;
pub type ListRulesRequest = ListRequest<Rule>;
pub type ListRulesResponse = Page<Rule>;

pub type CreateRateBasedRuleRequest = CreateRequest<RateBasedRule>;
pub type CreateRateBasedRuleResponse = CreateResponse<RateBasedRule>;
pub type GetRateBasedRuleRequest = GetRequest<RateBasedRule>;
pub type GetRateBasedRuleResponse = GetResponse<RateBasedRule>;
pub type UpdateRateBasedRuleRequest = UpdateRequest<RateBasedRule>;
pub type UpdateRateBasedRuleResponse = ChangeReceipt;
pub type DeleteRateBasedRuleRequest = DeleteRequest<RateBasedRule>;
pub type DeleteRateBasedRuleResponse = ChangeReceipt;
pub type ListRateBasedRulesRequest = ListRequest<RateBasedRule>;
pub type ListRateBasedRulesResponse = Page<RateBasedRule>;

pub type CreateRuleGroupRequest = CreateRequest<RuleGroup>;
pub type CreateRuleGroupResponse = CreateResponse<RuleGroup>;
pub type GetRuleGroupRequest = GetRequest<RuleGroup>;
pub type GetRuleGroupResponse = GetResponse<RuleGroup>;
pub type UpdateRuleGroupRequest = UpdateRequest<RuleGroup>;
pub type UpdateRuleGroupResponse = ChangeReceipt;
pub type DeleteRuleGroupRequest = DeleteRequest<RuleGroup>;
pub type DeleteRuleGroupResponse = ChangeReceipt;
pub type ListRuleGroupsRequest = ListRequest<RuleGroup>;
pub type ListRuleGroupsResponse = Page<RuleGroup>;

pub type CreateWebACLRequest = CreateRequest<WebACL>;
pub type CreateWebACLResponse = CreateResponse<WebACL>;
pub type GetWebACLRequest = GetRequest<WebACL>;
pub type GetWebACLResponse = GetResponse<WebACL>;
pub type UpdateWebACLRequest = UpdateRequest<WebACL>;
pub type UpdateWebACLResponse = ChangeReceipt;
pub type DeleteWebACLRequest = DeleteRequest<WebACL>;
pub type DeleteWebACLResponse = ChangeReceipt;
pub type ListWebACLsRequest = ListRequest<WebACL>;
pub type ListWebACLsResponse = Page<WebACL>;
